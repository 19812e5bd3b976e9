//! Flows that combine the engines with persistence.

pub mod checkout;

pub use checkout::{Checkout, CheckoutError, Quote, Settlement};
