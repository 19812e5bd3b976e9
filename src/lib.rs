pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fx;
pub mod import;
pub mod orchestration;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    Classification, CostBasisSummary, Decimal, Direction, Discount, LedgerEntry, Order,
    OrderStatus, Position, TimeMs, TradeResult, TxType,
};
pub use error::AppError;
pub use fx::{ExchangeRateSource, FxError, HttpRateSource, MockRateSource, RateBook};
