//! Lossless decimal money type backed by rust_decimal.
//!
//! Prices, sizes, fees and IDR amounts all flow through this type so that
//! fee and discount arithmetic is exact.

use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal number used for every monetary and price value in the journal.
///
/// Serializes to a JSON number. API responses use [`Decimal::to_canonical_string`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse from a decimal string without going through f64.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s.trim()).map(Decimal)
    }

    /// Canonical string form: trailing zeros stripped, never exponent notation.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn one() -> Self {
        Decimal(RustDecimal::ONE)
    }

    pub fn hundred() -> Self {
        Decimal(RustDecimal::ONE_HUNDRED)
    }

    pub fn from_i64(value: i64) -> Self {
        Decimal(RustDecimal::from(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Largest integer not greater than the value.
    pub fn floor(&self) -> Self {
        Decimal(self.0.floor())
    }

    /// `None` on overflow.
    pub fn checked_add(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_add(rhs.0).map(Decimal)
    }

    /// `None` on overflow.
    pub fn checked_sub(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_sub(rhs.0).map(Decimal)
    }

    /// `None` on overflow.
    pub fn checked_mul(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_mul(rhs.0).map(Decimal)
    }

    /// `None` on overflow or a zero divisor.
    pub fn checked_div(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_div(rhs.0).map(Decimal)
    }

    /// Clamps to the representable range instead of overflowing.
    pub fn saturating_add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0.saturating_add(rhs.0))
    }

    /// Round half away from zero to `dp` fractional digits.
    pub fn round_dp(&self, dp: u32) -> Self {
        Decimal(
            self.0
                .round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

/// Panics on overflow like `rust_decimal`; engine code uses the `checked_*` forms.
impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

/// Panics on a zero divisor or overflow like `rust_decimal`.
impl std::ops::Div for Decimal {
    type Output = Decimal;

    fn div(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_canonical_string_strips_trailing_zeros() {
        assert_eq!(d("50000.000").to_canonical_string(), "50000");
        assert_eq!(d("0.0100").to_canonical_string(), "0.01");
        assert!(!d("1000000").to_canonical_string().contains('e'));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(d("  42.5 "), d("42.5"));
        assert!(Decimal::from_str_canonical("abc").is_err());
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let sum = d("0.1") + d("0.2");
        assert_eq!(sum, d("0.3"));
        assert_eq!((d("10.5") * d("2.5")).to_canonical_string(), "26.25");
        assert_eq!((d("10") / d("4")).to_canonical_string(), "2.5");
    }

    #[test]
    fn test_checked_ops_report_overflow() {
        let max = Decimal::new(RustDecimal::MAX);
        assert_eq!(max.checked_mul(d("2")), None);
        assert_eq!(max.checked_add(d("1")), None);
        assert_eq!((-max).checked_sub(d("1")), None);
        assert_eq!(d("1").checked_div(Decimal::zero()), None);
        assert_eq!(max.checked_div(d("0.5")), None);
        assert_eq!(d("6").checked_div(d("4")), Some(d("1.5")));
        assert_eq!(max.saturating_add(d("1")), max);
    }

    #[test]
    fn test_floor_and_round() {
        assert_eq!(d("33333.33").floor(), d("33333"));
        assert_eq!(d("-1.5").floor(), d("-2"));
        assert_eq!(d("1.005").round_dp(2), d("1.01"));
    }

    #[test]
    fn test_min_max_clamp() {
        assert_eq!(d("5").min(d("3")), d("3"));
        assert_eq!(d("5").max(d("3")), d("5"));
        assert_eq!(d("150").clamp(Decimal::zero(), Decimal::hundred()), d("100"));
        assert_eq!(d("-4").clamp(Decimal::zero(), Decimal::hundred()), d("0"));
    }

    #[test]
    fn test_sign_helpers() {
        assert!(d("0.001").is_positive());
        assert!(d("-0.001").is_negative());
        assert!(!Decimal::zero().is_positive());
        assert!(!Decimal::zero().is_negative());
    }

    #[test]
    fn test_json_serialization_is_number() {
        let json = serde_json::to_value(d("123.456")).unwrap();
        assert!(json.is_number());
    }
}
