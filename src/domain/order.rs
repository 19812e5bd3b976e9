//! Subscription orders and their payment status transitions.

use crate::domain::{Decimal, TimeMs, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payment status of an order.
///
/// `PENDING` moves to exactly one terminal status and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Expired,
    Failed,
}

/// Effect of applying a status to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    /// Same status re-delivered; nothing to do.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderTransitionError {
    #[error("order is already {from} and cannot become {to}")]
    FromTerminal { from: OrderStatus, to: OrderStatus },
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Expired => "EXPIRED",
            OrderStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(OrderStatus::Pending),
            "PAID" => Some(OrderStatus::Paid),
            "EXPIRED" => Some(OrderStatus::Expired),
            "FAILED" => Some(OrderStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    /// Check whether moving to `next` is allowed.
    ///
    /// # Errors
    /// Returns `FromTerminal` when leaving a terminal status for a different one.
    pub fn transition(self, next: OrderStatus) -> Result<TransitionOutcome, OrderTransitionError> {
        if self == next {
            return Ok(TransitionOutcome::Unchanged);
        }
        if self.is_terminal() {
            return Err(OrderTransitionError::FromTerminal {
                from: self,
                to: next,
            });
        }
        // Pending -> Pending is caught above, so `next` is terminal here.
        Ok(TransitionOutcome::Applied)
    }
}

/// Terminal statuses that close an order without fulfilling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderClosure {
    Expired,
    Failed,
}

impl OrderClosure {
    pub fn from_status(status: OrderStatus) -> Option<Self> {
        match status {
            OrderStatus::Expired => Some(OrderClosure::Expired),
            OrderStatus::Failed => Some(OrderClosure::Failed),
            OrderStatus::Pending | OrderStatus::Paid => None,
        }
    }

    pub fn status(self) -> OrderStatus {
        match self {
            OrderClosure::Expired => OrderStatus::Expired,
            OrderClosure::Failed => OrderStatus::Failed,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Hosted payment gateway invoice.
    Gateway,
    /// Manual bank transfer with uploaded proof.
    BankTransfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Gateway => "GATEWAY",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GATEWAY" => Some(PaymentMethod::Gateway),
            "BANK_TRANSFER" => Some(PaymentMethod::BankTransfer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: String,
    pub user_id: UserId,
    pub plan_code: String,
    pub coupon_code: Option<String>,
    pub payment_method: PaymentMethod,
    pub base_amount: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: TimeMs,
    pub settled_at: Option<TimeMs>,
}
