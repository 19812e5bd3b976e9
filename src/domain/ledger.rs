//! Spot ledger entries and the cost-basis summary derived from them.

use crate::domain::{Decimal, TimeMs, TxType};
use serde::{Deserialize, Serialize};

/// One BUY or SELL leg in a spot holding's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub tx_type: TxType,
    pub quantity: Decimal,
    pub price: Decimal,
    pub time_ms: TimeMs,
}

impl LedgerEntry {
    pub fn new(tx_type: TxType, quantity: Decimal, price: Decimal, time_ms: TimeMs) -> Self {
        LedgerEntry {
            tx_type,
            quantity,
            price,
            time_ms,
        }
    }

    pub fn buy(quantity: Decimal, price: Decimal, time_ms: TimeMs) -> Self {
        Self::new(TxType::Buy, quantity, price, time_ms)
    }

    pub fn sell(quantity: Decimal, price: Decimal, time_ms: TimeMs) -> Self {
        Self::new(TxType::Sell, quantity, price, time_ms)
    }

    /// Stable content key used to drop duplicate rows on import.
    ///
    /// Two entries with equal type, quantity, price and time share a key
    /// regardless of how the decimals were written (`1.50` vs `1.5`).
    pub fn entry_key(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(if self.tx_type == TxType::Buy { b"B" } else { b"S" });
        hasher.update(self.quantity.to_canonical_string());
        hasher.update(b"|");
        hasher.update(self.price.to_canonical_string());
        hasher.update(self.time_ms.as_i64().to_le_bytes());
        let hash = hasher.finalize();
        format!("entry:{}", hex::encode(&hash[..16]))
    }

    /// `quantity × price`, or `None` if it overflows.
    pub fn notional(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.price)
    }
}

/// Aggregate over a full ledger. Recomputed from scratch, never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostBasisSummary {
    /// Average BUY price; zero when nothing was bought.
    pub avg_price: Decimal,
    /// Bought minus sold. Negative when sells exceed buys.
    pub total_quantity: Decimal,
    /// Sum of BUY notional. Sells do not reduce it.
    pub total_cost: Decimal,
}
