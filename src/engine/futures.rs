//! Futures P&L engine.
//!
//! All functions are pure. Degenerate inputs (zero entry price, missing
//! stop-loss, zero risk distance) produce `0` or `None`, never a panic.

use crate::domain::{Classification, Decimal, Direction, Position, TradeResult};

/// Fees are charged on both the entry and the exit leg.
pub const FEE_SIDES: i64 = 2;

/// Deadband around zero net P&L that is classified as breakeven (0.01).
pub fn breakeven_epsilon() -> Decimal {
    Decimal::new(rust_decimal::Decimal::new(1, 2))
}

/// Signed price move relative to entry, positive when the trade is in profit.
///
/// `None` for a zero entry or when the ratio is not representable.
fn percent_move(direction: Direction, entry: Decimal, exit: Decimal) -> Option<Decimal> {
    if entry.is_zero() {
        return None;
    }
    let delta = match direction {
        Direction::Long => exit.checked_sub(entry)?,
        Direction::Short => entry.checked_sub(exit)?,
    };
    delta.checked_div(entry)
}

/// Gross P&L in quote currency: `move × size × leverage`.
///
/// Zero when entry is zero or the result overflows.
pub fn calculate_pnl(
    direction: Direction,
    entry: Decimal,
    exit: Decimal,
    size: Decimal,
    leverage: Decimal,
) -> Decimal {
    percent_move(direction, entry, exit)
        .and_then(|m| m.checked_mul(size))
        .and_then(|v| v.checked_mul(leverage))
        .unwrap_or_default()
}

/// Return on margin in percent. Independent of position size.
pub fn calculate_pnl_percent(
    direction: Direction,
    entry: Decimal,
    exit: Decimal,
    leverage: Decimal,
) -> Decimal {
    percent_move(direction, entry, exit)
        .and_then(|m| m.checked_mul(Decimal::hundred()))
        .and_then(|v| v.checked_mul(leverage))
        .unwrap_or_default()
}

/// Round-trip fee: `size × fee% / 100 × FEE_SIDES`.
pub fn calculate_fee_amount(size: Decimal, fee_percent_per_side: Decimal) -> Decimal {
    let rate = fee_percent_per_side / Decimal::hundred();
    size.checked_mul(rate)
        .and_then(|v| v.checked_mul(Decimal::from_i64(FEE_SIDES)))
        .unwrap_or_default()
}

/// Reward distance over risk distance.
///
/// `None` when either level is missing, the stop sits exactly at entry, or a
/// distance overflows. Levels on the wrong side of entry still produce a ratio.
pub fn calculate_rrr(
    direction: Direction,
    entry: Decimal,
    stop_loss: Option<Decimal>,
    take_profit: Option<Decimal>,
) -> Option<Decimal> {
    let (sl, tp) = (stop_loss?, take_profit?);
    let (risk, reward) = match direction {
        Direction::Long => (entry.checked_sub(sl)?, tp.checked_sub(entry)?),
        Direction::Short => (sl.checked_sub(entry)?, entry.checked_sub(tp)?),
    };
    reward.abs().checked_div(risk.abs())
}

pub fn determine_result(net_pnl: Decimal) -> Classification {
    let eps = breakeven_epsilon();
    if net_pnl > eps {
        Classification::Win
    } else if net_pnl < -eps {
        Classification::Loss
    } else {
        Classification::Breakeven
    }
}

/// Notional size that loses `risk_amount` when the stop `stop_loss_percent` away is hit.
///
/// Zero for a non-positive stop distance or an unrepresentable size.
pub fn calculate_position_size(risk_amount: Decimal, stop_loss_percent: Decimal) -> Decimal {
    if !stop_loss_percent.is_positive() {
        return Decimal::zero();
    }
    risk_amount
        .checked_div(stop_loss_percent / Decimal::hundred())
        .unwrap_or_default()
}

/// Evaluate a logged position into its trade result.
pub fn evaluate(position: &Position) -> TradeResult {
    let gross_pnl = calculate_pnl(
        position.direction,
        position.entry_price,
        position.exit_price,
        position.size,
        position.leverage,
    );
    let fee_amount = calculate_fee_amount(position.size, position.fee_percent);
    let net_pnl = gross_pnl.checked_sub(fee_amount).unwrap_or_default();

    TradeResult {
        gross_pnl,
        fee_amount,
        net_pnl,
        pnl_percent: calculate_pnl_percent(
            position.direction,
            position.entry_price,
            position.exit_price,
            position.leverage,
        ),
        risk_reward: calculate_rrr(
            position.direction,
            position.entry_price,
            position.stop_loss,
            position.take_profit,
        ),
        classification: determine_result(net_pnl),
    }
}
