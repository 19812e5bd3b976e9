//! Pure computation engines for the trade journal.
//!
//! Nothing here touches the database, the network or the clock. Callers pass
//! every input explicitly, including `now` for coupon validation.

pub mod futures;
pub mod pricing;
pub mod spot;
pub mod stats;

pub use futures::{
    calculate_fee_amount, calculate_pnl, calculate_pnl_percent, calculate_position_size,
    calculate_rrr, determine_result, evaluate,
};
pub use pricing::{apply_discount, validate_discount};
pub use spot::{calculate_average_price, unrealized_pnl};
pub use stats::{summarize, JournalStats};
