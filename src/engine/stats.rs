//! Journal analytics over evaluated trades.

use crate::domain::{Classification, Decimal, TradeResult};
use serde::Serialize;

/// Aggregate figures for a set of closed trades.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct JournalStats {
    pub total_trades: u64,
    pub wins: u64,
    pub losses: u64,
    pub breakevens: u64,
    /// Percent of all trades classified as wins.
    pub win_rate: Decimal,
    pub net_pnl: Decimal,
    pub total_fees: Decimal,
    pub gross_profit: Decimal,
    /// Absolute sum of losing net P&L.
    pub gross_loss: Decimal,
    /// `None` when there is no losing P&L to divide by, or the ratio overflows.
    pub profit_factor: Option<Decimal>,
    pub average_rrr: Option<Decimal>,
    pub largest_win: Decimal,
    /// Absolute value of the worst net P&L.
    pub largest_loss: Decimal,
}

/// Summarize trade results. Wins and losses follow `classification`, so a
/// trade inside the breakeven deadband counts toward neither side. Sums
/// saturate at the decimal range instead of overflowing.
pub fn summarize(results: &[TradeResult]) -> JournalStats {
    let mut stats = JournalStats::default();
    let mut rrr_sum = Decimal::zero();
    let mut rrr_count = 0i64;

    for result in results {
        stats.total_trades += 1;
        stats.net_pnl = stats.net_pnl.saturating_add(result.net_pnl);
        stats.total_fees = stats.total_fees.saturating_add(result.fee_amount);

        match result.classification {
            Classification::Win => {
                stats.wins += 1;
                stats.gross_profit = stats.gross_profit.saturating_add(result.net_pnl);
                stats.largest_win = stats.largest_win.max(result.net_pnl);
            }
            Classification::Loss => {
                stats.losses += 1;
                stats.gross_loss = stats.gross_loss.saturating_add(result.net_pnl.abs());
                stats.largest_loss = stats.largest_loss.max(result.net_pnl.abs());
            }
            Classification::Breakeven => stats.breakevens += 1,
        }

        if let Some(rrr) = result.risk_reward {
            rrr_sum = rrr_sum.saturating_add(rrr);
            rrr_count += 1;
        }
    }

    if stats.total_trades > 0 {
        stats.win_rate = Decimal::from_i64(stats.wins as i64) * Decimal::hundred()
            / Decimal::from_i64(stats.total_trades as i64);
    }
    if stats.gross_loss.is_positive() {
        stats.profit_factor = stats.gross_profit.checked_div(stats.gross_loss);
    }
    if rrr_count > 0 {
        stats.average_rrr = Some(rrr_sum / Decimal::from_i64(rrr_count));
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn result(net: &str, fee: &str, rrr: Option<&str>) -> TradeResult {
        let net_pnl = d(net);
        TradeResult {
            gross_pnl: net_pnl + d(fee),
            fee_amount: d(fee),
            net_pnl,
            pnl_percent: Decimal::zero(),
            risk_reward: rrr.map(d),
            classification: crate::engine::futures::determine_result(net_pnl),
        }
    }

    #[test]
    fn test_empty() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.win_rate, Decimal::zero());
        assert_eq!(stats.profit_factor, None);
        assert_eq!(stats.average_rrr, None);
    }

    #[test]
    fn test_mixed_results() {
        let results = vec![
            result("300", "2", Some("2")),
            result("100", "1", Some("3")),
            result("-200", "2", None),
            result("0.005", "1", Some("1")),
        ];
        let stats = summarize(&results);

        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.breakevens, 1);
        assert_eq!(stats.win_rate, d("50"));
        assert_eq!(stats.net_pnl, d("200.005"));
        assert_eq!(stats.total_fees, d("6"));
        assert_eq!(stats.gross_profit, d("400"));
        assert_eq!(stats.gross_loss, d("200"));
        assert_eq!(stats.profit_factor, Some(d("2")));
        assert_eq!(stats.average_rrr, Some(d("2")));
        assert_eq!(stats.largest_win, d("300"));
        assert_eq!(stats.largest_loss, d("200"));
    }

    #[test]
    fn test_all_wins_has_no_profit_factor() {
        let stats = summarize(&[result("10", "0", None), result("20", "0", None)]);
        assert_eq!(stats.win_rate, d("100"));
        assert_eq!(stats.profit_factor, None);
    }

    #[test]
    fn test_extreme_results_saturate() {
        let max = Decimal::new(rust_decimal::Decimal::MAX);
        let tiny = d("0.0000000000000000000000000001");
        let big_win = TradeResult {
            gross_pnl: max,
            fee_amount: Decimal::zero(),
            net_pnl: max,
            pnl_percent: Decimal::zero(),
            risk_reward: Some(max),
            classification: Classification::Win,
        };
        let tiny_loss = TradeResult {
            net_pnl: -tiny,
            gross_pnl: -tiny,
            risk_reward: Some(max),
            classification: Classification::Loss,
            ..big_win.clone()
        };
        let stats = summarize(&[big_win.clone(), big_win, tiny_loss]);
        assert_eq!(stats.gross_profit, max);
        assert_eq!(stats.profit_factor, None);
        assert!(stats.average_rrr.is_some());
        assert_eq!(stats.total_trades, 3);
    }
}
