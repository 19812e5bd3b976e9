//! Journal analytics endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::futures::{PositionRequest, TradeResultResponse};
use crate::domain::TradeResult;
use crate::engine;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct JournalStatsRequest {
    pub positions: Vec<PositionRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStatsResponse {
    pub results: Vec<TradeResultResponse>,
    pub total_trades: u64,
    pub wins: u64,
    pub losses: u64,
    pub breakevens: u64,
    pub win_rate: String,
    pub net_pnl: String,
    pub total_fees: String,
    pub gross_profit: String,
    pub gross_loss: String,
    pub profit_factor: Option<String>,
    pub average_rrr: Option<String>,
    pub largest_win: String,
    pub largest_loss: String,
}

pub async fn journal_stats(
    Json(request): Json<JournalStatsRequest>,
) -> Result<Json<JournalStatsResponse>, AppError> {
    let results = request
        .positions
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            p.into_position()
                .map(|pos| engine::evaluate(&pos))
                .map_err(|e| match e {
                    AppError::BadRequest(msg) => {
                        AppError::BadRequest(format!("positions[{}]: {}", i, msg))
                    }
                    other => other,
                })
        })
        .collect::<Result<Vec<TradeResult>, _>>()?;

    let stats = engine::summarize(&results);

    Ok(Json(JournalStatsResponse {
        results: results.iter().map(TradeResultResponse::from).collect(),
        total_trades: stats.total_trades,
        wins: stats.wins,
        losses: stats.losses,
        breakevens: stats.breakevens,
        win_rate: stats.win_rate.round_dp(2).to_canonical_string(),
        net_pnl: stats.net_pnl.to_canonical_string(),
        total_fees: stats.total_fees.to_canonical_string(),
        gross_profit: stats.gross_profit.to_canonical_string(),
        gross_loss: stats.gross_loss.to_canonical_string(),
        profit_factor: stats.profit_factor.map(|v| v.round_dp(4).to_canonical_string()),
        average_rrr: stats.average_rrr.map(|v| v.round_dp(4).to_canonical_string()),
        largest_win: stats.largest_win.to_canonical_string(),
        largest_loss: stats.largest_loss.to_canonical_string(),
    }))
}
