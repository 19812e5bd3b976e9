//! Domain types for the trade journal.
//!
//! This module provides:
//! - Lossless numeric handling via the Decimal wrapper
//! - Primitives: TimeMs, UserId, Direction, TxType
//! - Futures positions and trade results
//! - Spot ledger entries and cost-basis summaries
//! - Coupons, orders, plans and subscriptions for checkout
//! - Display currencies and the exchange-rate value object

pub mod currency;
pub mod decimal;
pub mod discount;
pub mod ledger;
pub mod order;
pub mod position;
pub mod primitives;
pub mod subscription;

pub use currency::{Currency, ExchangeRate};
pub use decimal::Decimal;
pub use discount::{Discount, DiscountKind, DiscountQuote, DiscountRejection};
pub use ledger::{CostBasisSummary, LedgerEntry};
pub use order::{
    Order, OrderClosure, OrderStatus, OrderTransitionError, PaymentMethod, TransitionOutcome,
};
pub use position::{Classification, Position, PositionError, TradeResult};
pub use primitives::{Direction, TimeMs, TxType, UserId};
pub use subscription::{Plan, Subscription};
