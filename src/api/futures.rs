//! Futures P&L endpoints.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_decimal, parse_optional_decimal};
use crate::domain::{Direction, Position, TradeResult};
use crate::engine;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequest {
    pub direction: String,
    pub entry_price: String,
    pub exit_price: String,
    pub size: String,
    pub leverage: Option<String>,
    pub fee_percent: Option<String>,
    pub stop_loss: Option<String>,
    pub take_profit: Option<String>,
}

impl PositionRequest {
    /// Validate into a domain position. Leverage defaults to 1, fee to 0.
    pub fn into_position(self) -> Result<Position, AppError> {
        let direction = Direction::parse(&self.direction)
            .ok_or_else(|| AppError::BadRequest("direction must be LONG or SHORT".to_string()))?;
        let leverage = parse_optional_decimal("leverage", self.leverage.as_deref())?
            .unwrap_or_else(crate::domain::Decimal::one);
        let fee_percent = parse_optional_decimal("feePercent", self.fee_percent.as_deref())?
            .unwrap_or_default();

        let mut position = Position::new(
            direction,
            parse_decimal("entryPrice", &self.entry_price)?,
            parse_decimal("exitPrice", &self.exit_price)?,
            parse_decimal("size", &self.size)?,
            leverage,
            fee_percent,
        )
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

        position.stop_loss = parse_optional_decimal("stopLoss", self.stop_loss.as_deref())?;
        position.take_profit = parse_optional_decimal("takeProfit", self.take_profit.as_deref())?;
        Ok(position)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeResultResponse {
    pub gross_pnl: String,
    pub fee_amount: String,
    pub net_pnl: String,
    pub pnl_percent: String,
    pub risk_reward: Option<String>,
    pub classification: &'static str,
}

impl From<&TradeResult> for TradeResultResponse {
    fn from(result: &TradeResult) -> Self {
        TradeResultResponse {
            gross_pnl: result.gross_pnl.to_canonical_string(),
            fee_amount: result.fee_amount.to_canonical_string(),
            net_pnl: result.net_pnl.to_canonical_string(),
            pnl_percent: result.pnl_percent.to_canonical_string(),
            risk_reward: result.risk_reward.map(|r| r.to_canonical_string()),
            classification: result.classification.as_str(),
        }
    }
}

pub async fn evaluate_position(
    Json(request): Json<PositionRequest>,
) -> Result<Json<TradeResultResponse>, AppError> {
    let position = request.into_position()?;
    let result = engine::evaluate(&position);
    Ok(Json(TradeResultResponse::from(&result)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSizeRequest {
    pub risk_amount: String,
    pub stop_loss_percent: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSizeResponse {
    pub size: String,
}

pub async fn position_size(
    Json(request): Json<PositionSizeRequest>,
) -> Result<Json<PositionSizeResponse>, AppError> {
    let risk_amount = parse_decimal("riskAmount", &request.risk_amount)?;
    let stop_loss_percent = parse_decimal("stopLossPercent", &request.stop_loss_percent)?;
    let size = engine::calculate_position_size(risk_amount, stop_loss_percent);
    Ok(Json(PositionSizeResponse {
        size: size.to_canonical_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(direction: &str, entry: &str) -> PositionRequest {
        PositionRequest {
            direction: direction.to_string(),
            entry_price: entry.to_string(),
            exit_price: "110".to_string(),
            size: "1000".to_string(),
            leverage: None,
            fee_percent: None,
            stop_loss: Some("".to_string()),
            take_profit: None,
        }
    }

    #[test]
    fn test_defaults_applied() {
        let position = request("long", "100").into_position().unwrap();
        assert_eq!(position.leverage, crate::domain::Decimal::one());
        assert!(position.fee_percent.is_zero());
        assert_eq!(position.stop_loss, None);
    }

    #[test]
    fn test_bad_direction() {
        assert!(matches!(
            request("sideways", "100").into_position(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_zero_entry_rejected() {
        match request("SHORT", "0").into_position() {
            Err(AppError::BadRequest(msg)) => {
                assert_eq!(msg, "entry price must be greater than zero")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
