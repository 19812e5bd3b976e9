pub mod catalog;
pub mod checkout;
pub mod futures;
pub mod fx;
pub mod health;
pub mod journal;
pub mod spot;
pub mod users;

use crate::db::Repository;
use crate::domain::Decimal;
use crate::error::AppError;
use crate::fx::RateBook;
use crate::orchestration::Checkout;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub checkout: Checkout,
    pub rates: Arc<RateBook>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, rates: Arc<RateBook>) -> Self {
        Self {
            checkout: Checkout::new(repo.clone()),
            repo,
            rates,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/futures/evaluate", post(futures::evaluate_position))
        .route("/v1/futures/position-size", post(futures::position_size))
        .route("/v1/spot/cost-basis", post(spot::cost_basis))
        .route("/v1/spot/import", post(spot::import_ledger))
        .route("/v1/journal/stats", post(journal::journal_stats))
        .route("/v1/fx/rate", get(fx::get_rate))
        .route("/v1/fx/convert", post(fx::convert))
        .route("/v1/plans", get(catalog::list_plans).post(catalog::upsert_plan))
        .route("/v1/coupons", post(catalog::upsert_coupon))
        .route("/v1/coupons/:code", get(catalog::get_coupon))
        .route("/v1/checkout/quote", post(checkout::quote))
        .route("/v1/orders", post(checkout::create_order))
        .route("/v1/orders/:id", get(checkout::get_order))
        .route("/v1/orders/:id/status", post(checkout::update_order_status))
        .route("/v1/users/:id/orders", get(users::list_orders))
        .route("/v1/users/:id/subscription", get(users::get_subscription))
        .layer(cors)
        .with_state(state)
}

/// Parse a required decimal request field.
pub(crate) fn parse_decimal(field: &str, value: &str) -> Result<Decimal, AppError> {
    Decimal::from_str_canonical(value)
        .map_err(|_| AppError::BadRequest(format!("Invalid {}", field)))
}

/// Parse an optional decimal request field; blank strings count as absent.
pub(crate) fn parse_optional_decimal(
    field: &str,
    value: Option<&str>,
) -> Result<Option<Decimal>, AppError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_decimal(field, s))
        .transpose()
}
