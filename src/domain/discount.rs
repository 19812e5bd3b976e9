//! Coupon discounts applied to subscription prices.

use crate::domain::{Decimal, TimeMs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiscountKind {
    /// Magnitude is a percent of the base price, in `[0, 100]`.
    Percent,
    /// Magnitude is an absolute amount in the base price's currency.
    Fixed,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Percent => "PERCENT",
            DiscountKind::Fixed => "FIXED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PERCENT" | "PERCENTAGE" => Some(DiscountKind::Percent),
            "FIXED" => Some(DiscountKind::Fixed),
            _ => None,
        }
    }
}

/// A coupon as stored for checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub code: String,
    pub kind: DiscountKind,
    pub magnitude: Decimal,
    pub max_uses: Option<i64>,
    pub used_count: i64,
    pub expires_at: Option<TimeMs>,
    pub active: bool,
}

impl Discount {
    /// Active, uncapped, non-expiring coupon.
    pub fn new(code: impl Into<String>, kind: DiscountKind, magnitude: Decimal) -> Self {
        Discount {
            code: code.into(),
            kind,
            magnitude,
            max_uses: None,
            used_count: 0,
            expires_at: None,
            active: true,
        }
    }

    pub fn percent(code: impl Into<String>, magnitude: Decimal) -> Self {
        Self::new(code, DiscountKind::Percent, magnitude)
    }

    pub fn fixed(code: impl Into<String>, magnitude: Decimal) -> Self {
        Self::new(code, DiscountKind::Fixed, magnitude)
    }

    pub fn with_max_uses(mut self, max_uses: i64) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    pub fn with_used_count(mut self, used_count: i64) -> Self {
        self.used_count = used_count;
        self
    }

    pub fn with_expiry(mut self, expires_at: TimeMs) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Why a coupon cannot be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountRejection {
    #[error("coupon is not active")]
    Inactive,
    #[error("coupon has expired")]
    Expired,
    #[error("coupon usage limit reached")]
    UsageLimitReached,
}

/// Amounts charged at order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountQuote {
    pub base_amount: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
}
