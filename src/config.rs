use crate::domain::Decimal;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub fx_api_url: String,
    pub fx_refresh_secs: u64,
    /// USD→IDR rate served until the first successful refresh.
    pub fx_fallback_usd_idr: Decimal,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

const DEFAULT_FX_API_URL: &str = "https://open.er-api.com/v6";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let fx_api_url = env_map
            .get("FX_API_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_FX_API_URL.to_string());

        let fx_refresh_secs = env_map
            .get("FX_REFRESH_SECS")
            .map(|s| s.as_str())
            .unwrap_or("3600")
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "FX_REFRESH_SECS".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        let fx_fallback_usd_idr = env_map
            .get("FX_FALLBACK_USD_IDR")
            .map(|s| s.as_str())
            .unwrap_or("16000")
            .parse::<Decimal>()
            .ok()
            .filter(|rate| rate.is_positive())
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "FX_FALLBACK_USD_IDR".to_string(),
                    "must be a positive decimal".to_string(),
                )
            })?;

        Ok(Config {
            port,
            database_path,
            fx_api_url,
            fx_refresh_secs,
            fx_fallback_usd_idr,
        })
    }
}
