//! Exchange-rate sources and the versioned rate book.

use crate::domain::{Decimal, TimeMs};
use async_trait::async_trait;
use std::fmt;

pub mod book;
pub mod http;
pub mod mock;

pub use book::RateBook;
pub use http::HttpRateSource;
pub use mock::MockRateSource;

/// A USD→IDR quote as returned by a source, before it is versioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuote {
    pub usd_to_idr: Decimal,
    pub fetched_at: TimeMs,
}

/// Anything that can quote the current USD→IDR rate.
///
/// Implementations handle their own retry/backoff.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync + fmt::Debug {
    async fn fetch_usd_idr(&self) -> Result<RateQuote, FxError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FxError {
    /// Connection failure, DNS, timeout.
    NetworkError(String),
    HttpError { status: u16, message: String },
    ParseError(String),
    RateLimited,
    /// The source answered with a zero or negative rate.
    InvalidRate(String),
}

impl fmt::Display for FxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            FxError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            FxError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FxError::RateLimited => write!(f, "Rate limited"),
            FxError::InvalidRate(rate) => write!(f, "Invalid rate: {}", rate),
        }
    }
}

impl std::error::Error for FxError {}
