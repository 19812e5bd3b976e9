//! Exchange-rate endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::api::parse_decimal;
use crate::domain::currency::{format_amount, to_canonical_units};
use crate::domain::{Currency, ExchangeRate};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    pub usd_to_idr: String,
    pub version: u64,
    pub fetched_at: i64,
}

impl From<ExchangeRate> for RateResponse {
    fn from(rate: ExchangeRate) -> Self {
        RateResponse {
            usd_to_idr: rate.usd_to_idr.to_canonical_string(),
            version: rate.version,
            fetched_at: rate.fetched_at.as_i64(),
        }
    }
}

pub async fn get_rate(State(state): State<AppState>) -> Json<RateResponse> {
    Json(RateResponse::from(state.rates.snapshot().await))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub amount: String,
    pub currency: String,
    /// Currency for the formatted text; defaults to `currency`.
    pub display: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub usd: String,
    pub formatted: String,
    pub rate_version: u64,
}

fn parse_currency(field: &str, value: &str) -> Result<Currency, AppError> {
    Currency::parse(value)
        .ok_or_else(|| AppError::BadRequest(format!("{} must be USD or IDR", field)))
}

/// Convert an amount to canonical USD and format it, using one rate snapshot
/// for both steps.
pub async fn convert(
    State(state): State<AppState>,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<ConvertResponse>, AppError> {
    let amount = parse_decimal("amount", &request.amount)?;
    let currency = parse_currency("currency", &request.currency)?;
    let display = match request.display.as_deref() {
        Some(d) => parse_currency("display", d)?,
        None => currency,
    };

    let rate = state.rates.snapshot().await;
    let usd = to_canonical_units(amount, currency, &rate);

    Ok(Json(ConvertResponse {
        usd: usd.to_canonical_string(),
        formatted: format_amount(usd, display, &rate),
        rate_version: rate.version,
    }))
}
