//! Display currencies and the exchange rate used at the API boundary.
//!
//! Engines work in unit-less quote-currency numbers. Amounts typed in IDR are
//! converted to canonical USD before reaching them, and converted back only
//! for display. The rate is always passed in explicitly.

use crate::domain::{Decimal, TimeMs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Idr,
}

impl Currency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "IDR" => Some(Currency::Idr),
            _ => None,
        }
    }
}

/// USD to IDR rate snapshot.
///
/// `version` increases by one on every successful refresh so a caller can tell
/// which rate a formatted value was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub usd_to_idr: Decimal,
    pub version: u64,
    pub fetched_at: TimeMs,
}

impl ExchangeRate {
    pub fn new(usd_to_idr: Decimal, version: u64, fetched_at: TimeMs) -> Self {
        ExchangeRate {
            usd_to_idr,
            version,
            fetched_at,
        }
    }

    /// The rate that replaces this one after a refresh.
    pub fn next(&self, usd_to_idr: Decimal, fetched_at: TimeMs) -> Self {
        ExchangeRate {
            usd_to_idr,
            version: self.version + 1,
            fetched_at,
        }
    }
}

/// Convert an amount in `currency` to canonical USD. A zero rate or an
/// unrepresentable result yields zero.
pub fn to_canonical_units(amount: Decimal, currency: Currency, rate: &ExchangeRate) -> Decimal {
    match currency {
        Currency::Usd => amount,
        Currency::Idr => amount.checked_div(rate.usd_to_idr).unwrap_or_default(),
    }
}

/// Convert canonical USD to `currency`. An unrepresentable result yields zero.
pub fn from_canonical_units(usd: Decimal, currency: Currency, rate: &ExchangeRate) -> Decimal {
    match currency {
        Currency::Usd => usd,
        Currency::Idr => usd.checked_mul(rate.usd_to_idr).unwrap_or_default(),
    }
}

/// Human-readable amount: `$1,234.56` or `Rp 1.234.567`.
pub fn format_amount(usd: Decimal, currency: Currency, rate: &ExchangeRate) -> String {
    let value = from_canonical_units(usd, currency, rate);
    match currency {
        Currency::Usd => {
            let rounded = value.round_dp(2).abs();
            let text = format!("{:.2}", rounded.inner());
            let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
            let sign = if value.round_dp(2).is_negative() { "-" } else { "" };
            format!("{}${}.{}", sign, group_thousands(int_part, ','), frac_part)
        }
        Currency::Idr => {
            let rounded = value.round_dp(0);
            let digits = rounded.abs().to_canonical_string();
            let sign = if rounded.is_negative() { "-" } else { "" };
            format!("{}Rp {}", sign, group_thousands(&digits, '.'))
        }
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}
