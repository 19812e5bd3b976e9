//! HTTP exchange-rate client (`{base}/latest/USD` JSON API).

use super::{ExchangeRateSource, FxError, RateQuote};
use crate::domain::{Decimal, TimeMs};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpRateSource {
    client: Client,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_latest_usd(&self) -> Result<serde_json::Value, FxError> {
        let url = format!("{}/latest/USD", self.base_url);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(FxError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(FxError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(FxError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(FxError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(FxError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl ExchangeRateSource for HttpRateSource {
    async fn fetch_usd_idr(&self) -> Result<RateQuote, FxError> {
        debug!(base_url = %self.base_url, "Fetching USD/IDR rate");
        let body = self.get_latest_usd().await?;
        let usd_to_idr = parse_idr_rate(&body)?;
        Ok(RateQuote {
            usd_to_idr,
            fetched_at: TimeMs::now(),
        })
    }
}

/// Extract `rates.IDR` as a positive decimal. Accepts JSON numbers or strings.
pub fn parse_idr_rate(body: &serde_json::Value) -> Result<Decimal, FxError> {
    let raw = body
        .get("rates")
        .and_then(|rates| rates.get("IDR"))
        .ok_or_else(|| FxError::ParseError("Missing rates.IDR".to_string()))?;

    let text = match raw {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => {
            return Err(FxError::ParseError(format!(
                "Unexpected rates.IDR value: {}",
                other
            )))
        }
    };

    let rate = Decimal::from_str_canonical(&text)
        .or_else(|_| rust_decimal::Decimal::from_scientific(&text).map(Decimal::new))
        .map_err(|e| FxError::ParseError(format!("Invalid rate {}: {}", text, e)))?;

    if !rate.is_positive() {
        return Err(FxError::InvalidRate(text));
    }
    Ok(rate)
}
