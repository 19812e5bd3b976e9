//! CSV import of spot ledger entries.
//!
//! Expected header: `type,quantity,price,time_ms`.

use crate::domain::{Decimal, LedgerEntry, TimeMs, TxType};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("csv error: {0}")]
    Csv(String),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "type")]
    tx_type: String,
    quantity: String,
    price: String,
    time_ms: i64,
}

/// Parsed ledger plus the rows that repeat an earlier row exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerImport {
    /// Every row, in file order. Repeated rows are kept: two identical fills
    /// are still two fills.
    pub entries: Vec<LedgerEntry>,
    /// 1-based data row numbers whose `entry_key` was already seen.
    pub duplicate_rows: Vec<usize>,
}

/// Parse ledger rows. Rows identical to an earlier row are kept and flagged
/// in `duplicate_rows` so the caller can surface a likely double import.
///
/// # Errors
/// Returns `InvalidRow` with the 1-based data row number for an unknown type
/// or a quantity/price that is not a positive decimal.
pub fn parse_ledger_csv(csv_bytes: &[u8]) -> Result<LedgerImport, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_bytes);

    let mut seen = HashSet::new();
    let mut import = LedgerImport::default();

    for (idx, record) in reader.deserialize::<Row>().enumerate() {
        let row_no = idx + 1;
        let row = record.map_err(|e| ImportError::Csv(e.to_string()))?;

        let invalid = |message: String| ImportError::InvalidRow {
            row: row_no,
            message,
        };

        let tx_type = TxType::parse(&row.tx_type)
            .ok_or_else(|| invalid(format!("invalid type: {}", row.tx_type)))?;
        let quantity = parse_positive(&row.quantity)
            .ok_or_else(|| invalid(format!("invalid quantity: {}", row.quantity)))?;
        let price = parse_positive(&row.price)
            .ok_or_else(|| invalid(format!("invalid price: {}", row.price)))?;

        let entry = LedgerEntry::new(tx_type, quantity, price, TimeMs::new(row.time_ms));
        if !seen.insert(entry.entry_key()) {
            debug!(row = row_no, "Ledger row repeats an earlier row");
            import.duplicate_rows.push(row_no);
        }
        import.entries.push(entry);
    }

    Ok(import)
}

fn parse_positive(s: &str) -> Option<Decimal> {
    Decimal::from_str_canonical(s)
        .ok()
        .filter(|d| d.is_positive())
}
