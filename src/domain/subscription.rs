//! Subscription plans and expiry extension.

use crate::domain::{Decimal, TimeMs, UserId};
use serde::{Deserialize, Serialize};

/// A purchasable subscription plan, priced in IDR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub code: String,
    pub name: String,
    pub price: Decimal,
    pub duration_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: UserId,
    pub plan_code: String,
    pub expires_at: TimeMs,
}

impl Subscription {
    pub fn is_active(&self, now: TimeMs) -> bool {
        self.expires_at > now
    }
}

/// New expiry after paying for `duration_days`.
///
/// Time left on an active subscription is kept: the extension starts at the
/// later of the current expiry and `now`.
pub fn extend_expiry(current: Option<TimeMs>, now: TimeMs, duration_days: i64) -> TimeMs {
    let start = match current {
        Some(expires_at) if expires_at > now => expires_at,
        _ => now,
    };
    start.plus_days(duration_days)
}
