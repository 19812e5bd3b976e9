//! Futures position input and its derived trade result.

use crate::domain::{Decimal, Direction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single leveraged futures position as logged in the journal.
///
/// Not persisted by the engine; built per request and evaluated on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub direction: Direction,
    pub entry_price: Decimal,
    pub exit_price: Decimal,
    /// Notional size in quote currency.
    pub size: Decimal,
    pub leverage: Decimal,
    /// Fee percent charged per side (entry and exit).
    pub fee_percent: Decimal,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("{0} must be greater than zero")]
    NonPositivePrice(&'static str),
    #[error("size must not be negative")]
    NegativeSize,
    #[error("leverage must be at least 1")]
    LeverageBelowOne,
    #[error("fee percent must not be negative")]
    NegativeFee,
}

impl Position {
    /// Build a validated position.
    ///
    /// # Errors
    /// Rejects non-positive entry/exit prices, negative size or fee, and
    /// leverage below 1. Stop-loss and take-profit are not checked against
    /// the direction.
    pub fn new(
        direction: Direction,
        entry_price: Decimal,
        exit_price: Decimal,
        size: Decimal,
        leverage: Decimal,
        fee_percent: Decimal,
    ) -> Result<Self, PositionError> {
        if !entry_price.is_positive() {
            return Err(PositionError::NonPositivePrice("entry price"));
        }
        if !exit_price.is_positive() {
            return Err(PositionError::NonPositivePrice("exit price"));
        }
        if size.is_negative() {
            return Err(PositionError::NegativeSize);
        }
        if leverage < Decimal::one() {
            return Err(PositionError::LeverageBelowOne);
        }
        if fee_percent.is_negative() {
            return Err(PositionError::NegativeFee);
        }

        Ok(Position {
            direction,
            entry_price,
            exit_price,
            size,
            leverage,
            fee_percent,
            stop_loss: None,
            take_profit: None,
        })
    }

    pub fn with_stop_loss(mut self, stop_loss: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    pub fn with_take_profit(mut self, take_profit: Decimal) -> Self {
        self.take_profit = Some(take_profit);
        self
    }
}

/// Outcome bucket for a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "WIN")]
    Win,
    #[serde(rename = "LOSS")]
    Loss,
    #[serde(rename = "BE")]
    Breakeven,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Win => "WIN",
            Classification::Loss => "LOSS",
            Classification::Breakeven => "BE",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result derived from a [`Position`]. Never mutated after computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeResult {
    pub gross_pnl: Decimal,
    pub fee_amount: Decimal,
    pub net_pnl: Decimal,
    /// Return on margin, in percent.
    pub pnl_percent: Decimal,
    pub risk_reward: Option<Decimal>,
    pub classification: Classification,
}
