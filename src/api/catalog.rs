//! Plan and coupon catalog endpoints.
//!
//! Writes are upserts keyed by code. A coupon's `usedCount` is owned by order
//! settlement and is never overwritten here.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::api::parse_decimal;
use crate::domain::{Decimal, Discount, DiscountKind, Plan, TimeMs};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub code: String,
    pub name: String,
    pub price: String,
    pub duration_days: i64,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        PlanResponse {
            code: plan.code,
            name: plan.name,
            price: plan.price.to_canonical_string(),
            duration_days: plan.duration_days,
        }
    }
}

pub async fn list_plans(State(state): State<AppState>) -> Result<Json<Vec<PlanResponse>>, AppError> {
    let plans = state.repo.list_plans().await?;
    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub code: String,
    pub name: String,
    pub price: String,
    pub duration_days: i64,
}

pub async fn upsert_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let code = request.code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("code is required".to_string()));
    }
    let price = parse_decimal("price", &request.price)?;
    if price.is_negative() {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    if request.duration_days <= 0 {
        return Err(AppError::BadRequest("durationDays must be positive".to_string()));
    }

    let plan = Plan {
        code: code.to_string(),
        name: request.name.trim().to_string(),
        price,
        duration_days: request.duration_days,
    };
    state.repo.upsert_plan(&plan).await?;
    tracing::info!(plan = %plan.code, price = %plan.price, "Plan saved");

    Ok(Json(PlanResponse::from(plan)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub code: String,
    pub kind: &'static str,
    pub magnitude: String,
    pub max_uses: Option<i64>,
    pub used_count: i64,
    pub expires_at: Option<i64>,
    pub active: bool,
}

impl From<Discount> for CouponResponse {
    fn from(coupon: Discount) -> Self {
        CouponResponse {
            kind: coupon.kind.as_str(),
            magnitude: coupon.magnitude.to_canonical_string(),
            max_uses: coupon.max_uses,
            used_count: coupon.used_count,
            expires_at: coupon.expires_at.map(|t| t.as_i64()),
            active: coupon.active,
            code: coupon.code,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRequest {
    pub code: String,
    pub kind: String,
    pub magnitude: String,
    pub max_uses: Option<i64>,
    pub expires_at: Option<i64>,
    pub active: Option<bool>,
}

impl CouponRequest {
    fn into_discount(self) -> Result<Discount, AppError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(AppError::BadRequest("code is required".to_string()));
        }
        let kind = DiscountKind::parse(&self.kind)
            .ok_or_else(|| AppError::BadRequest("kind must be PERCENT or FIXED".to_string()))?;
        let magnitude = parse_decimal("magnitude", &self.magnitude)?;
        if magnitude.is_negative() {
            return Err(AppError::BadRequest("magnitude must not be negative".to_string()));
        }
        if kind == DiscountKind::Percent && magnitude > Decimal::hundred() {
            return Err(AppError::BadRequest(
                "percent magnitude must not exceed 100".to_string(),
            ));
        }

        let mut coupon = Discount::new(code, kind, magnitude);
        if let Some(max_uses) = self.max_uses {
            if max_uses < 0 {
                return Err(AppError::BadRequest("maxUses must not be negative".to_string()));
            }
            coupon = coupon.with_max_uses(max_uses);
        }
        if let Some(expires_at) = self.expires_at {
            coupon = coupon.with_expiry(TimeMs::new(expires_at));
        }
        if self.active == Some(false) {
            coupon = coupon.inactive();
        }
        Ok(coupon)
    }
}

pub async fn upsert_coupon(
    State(state): State<AppState>,
    Json(request): Json<CouponRequest>,
) -> Result<Json<CouponResponse>, AppError> {
    let coupon = request.into_discount()?;
    state.repo.upsert_coupon(&coupon).await?;

    let stored = state
        .repo
        .get_coupon(&coupon.code)
        .await?
        .ok_or_else(|| AppError::Internal(format!("coupon {} not stored", coupon.code)))?;
    tracing::info!(
        coupon = %stored.code,
        kind = stored.kind.as_str(),
        magnitude = %stored.magnitude,
        "Coupon saved"
    );

    Ok(Json(CouponResponse::from(stored)))
}

pub async fn get_coupon(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CouponResponse>, AppError> {
    let coupon = state
        .repo
        .get_coupon(&code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("coupon not found: {}", code)))?;
    Ok(Json(CouponResponse::from(coupon)))
}
