//! Per-user order history and subscription status.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use super::checkout::OrderResponse;
use super::AppState;
use crate::domain::{TimeMs, UserId};
use crate::error::AppError;

pub async fn list_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, AppError> {
    let orders = state.repo.list_orders_for_user(&UserId::new(user_id)).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub user_id: String,
    pub plan_code: String,
    pub expires_at: i64,
    pub active: bool,
}

/// 404 when the user has never paid for a plan; a lapsed subscription is
/// returned with `active: false`.
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let subscription = state
        .repo
        .get_subscription(&UserId::new(user_id.clone()))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no subscription for user {}", user_id)))?;

    Ok(Json(SubscriptionResponse {
        active: subscription.is_active(TimeMs::now()),
        user_id: subscription.user_id.0,
        plan_code: subscription.plan_code,
        expires_at: subscription.expires_at.as_i64(),
    }))
}
