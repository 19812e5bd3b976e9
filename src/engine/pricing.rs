//! Pricing/discount engine.
//!
//! Computes what an order charges at creation time. It has no knowledge of
//! the order's later payment status.

use crate::domain::{Decimal, Discount, DiscountKind, DiscountQuote, DiscountRejection, TimeMs};

/// Charge for `base_price` after an optional coupon.
///
/// Out-of-range magnitudes are clamped: percent to `[0, 100]`, fixed to
/// `[0, base]`. The final amount never drops below zero.
pub fn apply_discount(base_price: Decimal, discount: Option<&Discount>) -> DiscountQuote {
    let discount_amount = match discount {
        None => Decimal::zero(),
        Some(d) => match d.kind {
            DiscountKind::Percent => {
                let pct = d.magnitude.clamp(Decimal::zero(), Decimal::hundred());
                base_price
                    .checked_mul(pct)
                    .map(|v| v / Decimal::hundred())
                    .or_else(|| (base_price / Decimal::hundred()).checked_mul(pct))
                    .unwrap_or_default()
                    .floor()
            }
            DiscountKind::Fixed => d.magnitude.max(Decimal::zero()).min(base_price),
        },
    }
    .max(Decimal::zero());

    DiscountQuote {
        base_amount: base_price,
        discount_amount,
        final_amount: base_price
            .checked_sub(discount_amount)
            .unwrap_or_default()
            .max(Decimal::zero()),
    }
}

/// Check that a coupon may be redeemed at `now`.
///
/// # Errors
/// Reports the first failing check, in order: inactive, expired, usage cap.
pub fn validate_discount(discount: &Discount, now: TimeMs) -> Result<(), DiscountRejection> {
    if !discount.active {
        return Err(DiscountRejection::Inactive);
    }
    if let Some(expires_at) = discount.expires_at {
        if expires_at <= now {
            return Err(DiscountRejection::Expired);
        }
    }
    if let Some(max_uses) = discount.max_uses {
        if discount.used_count >= max_uses {
            return Err(DiscountRejection::UsageLimitReached);
        }
    }
    Ok(())
}
