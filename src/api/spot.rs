//! Spot cost-basis endpoints.

use axum::body::Bytes;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_decimal, parse_optional_decimal};
use crate::domain::{CostBasisSummary, LedgerEntry, TimeMs, TxType};
use crate::engine;
use crate::error::AppError;
use crate::import::parse_ledger_csv;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryRequest {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub quantity: String,
    pub price: String,
    pub time_ms: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBasisRequest {
    pub entries: Vec<LedgerEntryRequest>,
    pub market_price: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBasisResponse {
    pub avg_price: String,
    pub total_quantity: String,
    pub total_cost: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrealized_pnl: Option<String>,
    pub entry_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<LedgerEntryResponse>>,
    /// Rows of an imported file that repeat an earlier row. They are still counted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_rows: Option<Vec<usize>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryResponse {
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub quantity: String,
    pub price: String,
    pub time_ms: i64,
}

impl From<&LedgerEntry> for LedgerEntryResponse {
    fn from(entry: &LedgerEntry) -> Self {
        LedgerEntryResponse {
            tx_type: entry.tx_type,
            quantity: entry.quantity.to_canonical_string(),
            price: entry.price.to_canonical_string(),
            time_ms: entry.time_ms.as_i64(),
        }
    }
}

impl CostBasisResponse {
    fn new(summary: &CostBasisSummary, unrealized: Option<String>, entry_count: usize) -> Self {
        CostBasisResponse {
            avg_price: summary.avg_price.to_canonical_string(),
            total_quantity: summary.total_quantity.to_canonical_string(),
            total_cost: summary.total_cost.to_canonical_string(),
            unrealized_pnl: unrealized,
            entry_count,
            entries: None,
            duplicate_rows: None,
        }
    }
}

fn to_entry(index: usize, req: &LedgerEntryRequest) -> Result<LedgerEntry, AppError> {
    let tx_type = TxType::parse(&req.tx_type).ok_or_else(|| {
        AppError::BadRequest(format!("entries[{}].type must be BUY or SELL", index))
    })?;
    let quantity = parse_decimal("quantity", &req.quantity)?;
    let price = parse_decimal("price", &req.price)?;
    if !quantity.is_positive() || !price.is_positive() {
        return Err(AppError::BadRequest(format!(
            "entries[{}] quantity and price must be positive",
            index
        )));
    }
    Ok(LedgerEntry::new(
        tx_type,
        quantity,
        price,
        TimeMs::new(req.time_ms.unwrap_or(0)),
    ))
}

pub async fn cost_basis(
    Json(request): Json<CostBasisRequest>,
) -> Result<Json<CostBasisResponse>, AppError> {
    let entries = request
        .entries
        .iter()
        .enumerate()
        .map(|(i, e)| to_entry(i, e))
        .collect::<Result<Vec<_>, _>>()?;
    let market_price = parse_optional_decimal("marketPrice", request.market_price.as_deref())?;

    let summary = engine::calculate_average_price(&entries);
    let unrealized = market_price.map(|p| engine::unrealized_pnl(&summary, p).to_canonical_string());

    Ok(Json(CostBasisResponse::new(&summary, unrealized, entries.len())))
}

/// Accepts a raw CSV body (`type,quantity,price,time_ms`).
pub async fn import_ledger(body: Bytes) -> Result<Json<CostBasisResponse>, AppError> {
    let import = parse_ledger_csv(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let summary = engine::calculate_average_price(&import.entries);
    let mut response = CostBasisResponse::new(&summary, None, import.entries.len());
    response.entries = Some(import.entries.iter().map(LedgerEntryResponse::from).collect());
    response.duplicate_rows = Some(import.duplicate_rows);
    Ok(Json(response))
}
