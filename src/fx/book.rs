//! Holder of the current exchange rate.

use super::ExchangeRateSource;
use crate::domain::{Decimal, ExchangeRate, TimeMs};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Current USD→IDR rate shared by request handlers.
///
/// Readers take a copy with [`RateBook::snapshot`] and pass it along, so one
/// request never sees two different rates.
#[derive(Debug)]
pub struct RateBook {
    current: RwLock<ExchangeRate>,
}

impl RateBook {
    /// Start at version 0 with a configured fallback rate.
    pub fn new(fallback_usd_to_idr: Decimal) -> Self {
        Self {
            current: RwLock::new(ExchangeRate::new(fallback_usd_to_idr, 0, TimeMs::new(0))),
        }
    }

    pub async fn snapshot(&self) -> ExchangeRate {
        *self.current.read().await
    }

    /// Fetch a new rate and install it as the next version.
    ///
    /// On failure the current rate is kept and returned unchanged.
    pub async fn refresh(&self, source: &dyn ExchangeRateSource) -> ExchangeRate {
        match source.fetch_usd_idr().await {
            Ok(quote) => {
                let mut current = self.current.write().await;
                *current = current.next(quote.usd_to_idr, quote.fetched_at);
                info!(
                    version = current.version,
                    usd_to_idr = %current.usd_to_idr,
                    "Exchange rate refreshed"
                );
                *current
            }
            Err(e) => {
                let current = self.snapshot().await;
                warn!(error = %e, version = current.version, "Exchange rate refresh failed, keeping current rate");
                current
            }
        }
    }
}
