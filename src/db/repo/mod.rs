//! Repository layer for database operations.
//!
//! Methods are organized across submodules by domain:
//! - `catalog.rs` - plans and coupons
//! - `orders.rs` - order intake and settlement
//! - `subscriptions.rs` - subscription lookups

mod catalog;
mod orders;
mod subscriptions;

use crate::domain::Decimal;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Database liveness check used by `/ready`.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Read a decimal stored as canonical TEXT, falling back to zero on bad data.
fn decimal_column(row: &SqliteRow, column: &str, key: &str) -> Decimal {
    let raw: String = row.get(column);
    Decimal::from_str(&raw).unwrap_or_else(|e| {
        warn!(
            key = %key,
            column = %column,
            value = %raw,
            error = %e,
            "Failed to parse stored decimal, using zero"
        );
        Decimal::default()
    })
}

/// Decode error for a TEXT column holding an unknown enum value.
fn unknown_value(column: &str, value: &str) -> sqlx::Error {
    sqlx::Error::Decode(format!("unknown {} value: {}", column, value).into())
}
