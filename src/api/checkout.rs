//! Checkout quotes and order lifecycle endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::domain::{Order, OrderStatus, PaymentMethod, TimeMs, UserId};
use crate::error::AppError;
use crate::orchestration::Quote;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub plan_code: String,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub plan_code: String,
    pub coupon_code: Option<String>,
    pub base_amount: String,
    pub discount_amount: String,
    pub final_amount: String,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        QuoteResponse {
            plan_code: quote.plan.code,
            coupon_code: quote.coupon_code,
            base_amount: quote.amounts.base_amount.to_canonical_string(),
            discount_amount: quote.amounts.discount_amount.to_canonical_string(),
            final_amount: quote.amounts.final_amount.to_canonical_string(),
        }
    }
}

pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let quote = state
        .checkout
        .quote(&request.plan_code, request.coupon_code.as_deref(), TimeMs::now())
        .await?;
    Ok(Json(QuoteResponse::from(quote)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub plan_code: String,
    pub coupon_code: Option<String>,
    pub payment_method: PaymentMethod,
    pub base_amount: String,
    pub discount_amount: String,
    pub final_amount: String,
    pub status: &'static str,
    pub created_at: i64,
    pub settled_at: Option<i64>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id.0,
            plan_code: order.plan_code,
            coupon_code: order.coupon_code,
            payment_method: order.payment_method,
            base_amount: order.base_amount.to_canonical_string(),
            discount_amount: order.discount_amount.to_canonical_string(),
            final_amount: order.final_amount.to_canonical_string(),
            status: order.status.as_str(),
            created_at: order.created_at.as_i64(),
            settled_at: order.settled_at.map(|t| t.as_i64()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub plan_code: String,
    pub coupon_code: Option<String>,
    pub payment_method: Option<String>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("userId is required".to_string()));
    }
    let payment_method = match request.payment_method.as_deref() {
        Some(m) => PaymentMethod::parse(m).ok_or_else(|| {
            AppError::BadRequest("paymentMethod must be GATEWAY or BANK_TRANSFER".to_string())
        })?,
        None => PaymentMethod::Gateway,
    };

    let order = state
        .checkout
        .create_order(
            UserId::new(user_id.to_string()),
            &request.plan_code,
            request.coupon_code.as_deref(),
            payment_method,
            TimeMs::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.checkout.get_order(&id).await?;
    Ok(Json(OrderResponse::from(order)))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub order: OrderResponse,
    pub applied: bool,
    pub subscription_expires_at: Option<i64>,
}

/// Payment confirmation hook. Re-sending the current status is answered with
/// `applied: false`; leaving a terminal status is a 409.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<SettlementResponse>, AppError> {
    let status = OrderStatus::parse(&request.status).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown order status: {}", request.status))
    })?;

    let settlement = state.checkout.settle_order(&id, status, TimeMs::now()).await?;

    Ok(Json(SettlementResponse {
        order: OrderResponse::from(settlement.order),
        applied: settlement.applied,
        subscription_expires_at: settlement.subscription_expires_at.map(|t| t.as_i64()),
    }))
}
