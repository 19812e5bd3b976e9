//! Scripted rate source for tests.

use super::{ExchangeRateSource, FxError, RateQuote};
use crate::domain::{Decimal, TimeMs};
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns queued responses in order, then repeats the last one.
#[derive(Debug)]
pub struct MockRateSource {
    responses: Mutex<Vec<Result<RateQuote, FxError>>>,
}

impl MockRateSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
        }
    }

    pub fn with_rate(self, usd_to_idr: Decimal, fetched_at: TimeMs) -> Self {
        self.push(Ok(RateQuote {
            usd_to_idr,
            fetched_at,
        }))
    }

    pub fn with_error(self, err: FxError) -> Self {
        self.push(Err(err))
    }

    fn push(self, response: Result<RateQuote, FxError>) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push(response);
        }
        self
    }
}

impl Default for MockRateSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeRateSource for MockRateSource {
    async fn fetch_usd_idr(&self) -> Result<RateQuote, FxError> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| FxError::NetworkError("mock poisoned".to_string()))?;
        match responses.len() {
            0 => Err(FxError::NetworkError("no scripted response".to_string())),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[tokio::test]
    async fn test_mock_replays_in_order_then_repeats_last() {
        let mock = MockRateSource::new()
            .with_error(FxError::RateLimited)
            .with_rate(d("16000"), TimeMs::new(1));

        assert_eq!(mock.fetch_usd_idr().await, Err(FxError::RateLimited));
        assert_eq!(mock.fetch_usd_idr().await.unwrap().usd_to_idr, d("16000"));
        assert_eq!(mock.fetch_usd_idr().await.unwrap().usd_to_idr, d("16000"));
    }

    #[test]
    fn test_empty_mock_errors() {
        let mock = MockRateSource::new();
        let result = tokio_test::block_on(mock.fetch_usd_idr());
        assert!(matches!(result, Err(FxError::NetworkError(_))));
    }
}
