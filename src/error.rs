use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::orchestration::CheckoutError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::PlanNotFound(_)
            | CheckoutError::CouponNotFound(_)
            | CheckoutError::OrderNotFound(_) => AppError::NotFound(err.to_string()),
            CheckoutError::CouponRejected { .. } => AppError::BadRequest(err.to_string()),
            CheckoutError::InvalidTransition(_) => AppError::Conflict(err.to_string()),
            CheckoutError::Db(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiscountRejection, OrderStatus, OrderTransitionError};

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_checkout_error_mapping() {
        assert_eq!(
            status_of(CheckoutError::PlanNotFound("X".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                CheckoutError::CouponRejected {
                    code: "OLD".to_string(),
                    reason: DiscountRejection::Expired,
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                CheckoutError::InvalidTransition(OrderTransitionError::FromTerminal {
                    from: OrderStatus::Paid,
                    to: OrderStatus::Failed,
                })
                .into()
            ),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_coupon_rejection_message() {
        let err: AppError = CheckoutError::CouponRejected {
            code: "CAP".to_string(),
            reason: DiscountRejection::UsageLimitReached,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Bad request: coupon CAP rejected: coupon usage limit reached"
        );
    }
}
