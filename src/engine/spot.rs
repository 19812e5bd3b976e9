//! Spot cost-basis engine (DCA ledger reduction).
//!
//! Average cost comes from BUY legs only. SELL legs lower the held quantity
//! but leave both the average price and the total cost untouched, so a fully
//! exited holding keeps its historical cost. No lot matching (FIFO/LIFO).

use crate::domain::{CostBasisSummary, Decimal, LedgerEntry, TxType};

/// Reduce a full ledger into its cost-basis summary. Entry order is irrelevant.
///
/// A ledger whose totals are not representable yields the zero summary.
pub fn calculate_average_price(entries: &[LedgerEntry]) -> CostBasisSummary {
    reduce_ledger(entries).unwrap_or_default()
}

fn reduce_ledger(entries: &[LedgerEntry]) -> Option<CostBasisSummary> {
    let mut total_bought = Decimal::zero();
    let mut total_cost = Decimal::zero();
    let mut total_sold = Decimal::zero();

    for entry in entries {
        match entry.tx_type {
            TxType::Buy => {
                total_bought = total_bought.checked_add(entry.quantity)?;
                total_cost = total_cost.checked_add(entry.notional()?)?;
            }
            TxType::Sell => total_sold = total_sold.checked_add(entry.quantity)?,
        }
    }

    let avg_price = if total_bought.is_positive() {
        total_cost.checked_div(total_bought)?
    } else {
        Decimal::zero()
    };

    Some(CostBasisSummary {
        avg_price,
        total_quantity: total_bought.checked_sub(total_sold)?,
        total_cost,
    })
}

/// Paper gain on the remaining holding at `market_price`.
///
/// Zero when nothing is held (net quantity zero or negative) or the gain is
/// not representable.
pub fn unrealized_pnl(summary: &CostBasisSummary, market_price: Decimal) -> Decimal {
    if !summary.total_quantity.is_positive() {
        return Decimal::zero();
    }
    market_price
        .checked_sub(summary.avg_price)
        .and_then(|diff| summary.total_quantity.checked_mul(diff))
        .unwrap_or_default()
}
