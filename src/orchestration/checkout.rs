//! Subscription checkout: quoting, order intake and payment settlement.

use crate::db::Repository;
use crate::domain::{
    Discount, DiscountQuote, DiscountRejection, Order, OrderClosure, OrderStatus,
    OrderTransitionError, PaymentMethod, Plan, TimeMs, TransitionOutcome, UserId,
};
use crate::engine::{apply_discount, validate_discount};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("plan not found: {0}")]
    PlanNotFound(String),
    #[error("coupon not found: {0}")]
    CouponNotFound(String),
    #[error("coupon {code} rejected: {reason}")]
    CouponRejected {
        code: String,
        reason: DiscountRejection,
    },
    #[error("order not found: {0}")]
    OrderNotFound(String),
    #[error(transparent)]
    InvalidTransition(#[from] OrderTransitionError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// A priced plan, optionally discounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub plan: Plan,
    pub coupon_code: Option<String>,
    pub amounts: DiscountQuote,
}

/// What settling an order did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub order: Order,
    pub applied: bool,
    /// New subscription expiry when this settlement paid the order.
    pub subscription_expires_at: Option<TimeMs>,
}

#[derive(Clone)]
pub struct Checkout {
    repo: Arc<Repository>,
}

impl Checkout {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    /// Price a plan with an optional coupon as of `now`.
    pub async fn quote(
        &self,
        plan_code: &str,
        coupon_code: Option<&str>,
        now: TimeMs,
    ) -> Result<Quote, CheckoutError> {
        let plan = self
            .repo
            .get_plan(plan_code)
            .await?
            .ok_or_else(|| CheckoutError::PlanNotFound(plan_code.to_string()))?;

        let coupon = match coupon_code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Some(self.redeemable_coupon(code, now).await?),
            None => None,
        };

        let amounts = apply_discount(plan.price, coupon.as_ref());
        Ok(Quote {
            plan,
            coupon_code: coupon.map(|c| c.code),
            amounts,
        })
    }

    async fn redeemable_coupon(&self, code: &str, now: TimeMs) -> Result<Discount, CheckoutError> {
        let coupon = self
            .repo
            .get_coupon(code)
            .await?
            .ok_or_else(|| CheckoutError::CouponNotFound(code.to_string()))?;

        validate_discount(&coupon, now).map_err(|reason| CheckoutError::CouponRejected {
            code: coupon.code.clone(),
            reason,
        })?;

        Ok(coupon)
    }

    /// Create a PENDING order charged at the quoted amount.
    pub async fn create_order(
        &self,
        user_id: UserId,
        plan_code: &str,
        coupon_code: Option<&str>,
        payment_method: PaymentMethod,
        now: TimeMs,
    ) -> Result<Order, CheckoutError> {
        let quote = self.quote(plan_code, coupon_code, now).await?;

        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            plan_code: quote.plan.code,
            coupon_code: quote.coupon_code,
            payment_method,
            base_amount: quote.amounts.base_amount,
            discount_amount: quote.amounts.discount_amount,
            final_amount: quote.amounts.final_amount,
            status: OrderStatus::Pending,
            created_at: now,
            settled_at: None,
        };
        self.repo.insert_order(&order).await?;

        info!(
            order_id = %order.id,
            user = %order.user_id,
            plan = %order.plan_code,
            amount = %order.final_amount,
            method = order.payment_method.as_str(),
            "Order created"
        );
        Ok(order)
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Order, CheckoutError> {
        self.repo
            .get_order(order_id)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_id.to_string()))
    }

    /// Apply a payment confirmation to an order.
    ///
    /// Re-delivering the current status is a no-op. Leaving a terminal status
    /// is an error. When two confirmations race, only one is applied.
    pub async fn settle_order(
        &self,
        order_id: &str,
        status: OrderStatus,
        now: TimeMs,
    ) -> Result<Settlement, CheckoutError> {
        let order = self.get_order(order_id).await?;
        self.settle_loaded(order, status, now).await
    }

    /// Settle from an order snapshot that may already be stale.
    async fn settle_loaded(
        &self,
        order: Order,
        status: OrderStatus,
        now: TimeMs,
    ) -> Result<Settlement, CheckoutError> {
        if order.status.transition(status)? == TransitionOutcome::Unchanged {
            return Ok(Settlement {
                order,
                applied: false,
                subscription_expires_at: None,
            });
        }

        let (applied, subscription_expires_at) = match OrderClosure::from_status(status) {
            Some(closure) => (
                self.repo.close_pending_order(&order.id, closure, now).await?,
                None,
            ),
            None => {
                let plan = self
                    .repo
                    .get_plan(&order.plan_code)
                    .await?
                    .ok_or_else(|| CheckoutError::PlanNotFound(order.plan_code.clone()))?;
                let expiry = self
                    .repo
                    .settle_paid_order(&order, plan.duration_days, now)
                    .await?;
                (expiry.is_some(), expiry)
            }
        };

        let order = self.get_order(&order.id).await?;
        if applied {
            info!(order_id = %order.id, status = %order.status, "Order settled");
        } else {
            // Another confirmation won the race; report against what is stored now.
            order.status.transition(status)?;
        }

        Ok(Settlement {
            order,
            applied,
            subscription_expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repo::test_support::repo;
    use crate::domain::primitives::MS_PER_DAY;
    use crate::domain::Decimal;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    async fn checkout() -> (Checkout, Arc<Repository>, tempfile::TempDir) {
        let (repo, temp) = repo().await;
        let repo = Arc::new(repo);
        (Checkout::new(repo.clone()), repo, temp)
    }

    #[tokio::test]
    async fn test_quote_without_coupon() {
        let (checkout, _repo, _temp) = checkout().await;
        let quote = checkout.quote("PRO_MONTHLY", None, TimeMs::new(0)).await.unwrap();
        assert_eq!(quote.amounts.final_amount, d("99000"));
        assert_eq!(quote.coupon_code, None);
    }

    #[tokio::test]
    async fn test_quote_blank_coupon_is_ignored() {
        let (checkout, _repo, _temp) = checkout().await;
        let quote = checkout
            .quote("PRO_MONTHLY", Some("  "), TimeMs::new(0))
            .await
            .unwrap();
        assert_eq!(quote.amounts.discount_amount, Decimal::zero());
    }

    #[tokio::test]
    async fn test_quote_unknown_plan_and_coupon() {
        let (checkout, _repo, _temp) = checkout().await;
        assert!(matches!(
            checkout.quote("GOLD", None, TimeMs::new(0)).await,
            Err(CheckoutError::PlanNotFound(_))
        ));
        assert!(matches!(
            checkout.quote("PRO_MONTHLY", Some("NOPE"), TimeMs::new(0)).await,
            Err(CheckoutError::CouponNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_quote_rejects_expired_coupon() {
        let (checkout, repo, _temp) = checkout().await;
        repo.upsert_coupon(&Discount::percent("OLD", d("20")).with_expiry(TimeMs::new(100)))
            .await
            .unwrap();

        let err = checkout
            .quote("PRO_MONTHLY", Some("old"), TimeMs::new(100))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::CouponRejected {
                reason: DiscountRejection::Expired,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_and_pay_order_extends_subscription() {
        let (checkout, repo, _temp) = checkout().await;
        repo.upsert_coupon(&Discount::percent("HALF", d("50")).with_max_uses(1))
            .await
            .unwrap();

        let user = UserId::new("user-1".to_string());
        let order = checkout
            .create_order(
                user.clone(),
                "PRO_MONTHLY",
                Some("half"),
                PaymentMethod::BankTransfer,
                TimeMs::new(0),
            )
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.coupon_code.as_deref(), Some("HALF"));
        assert_eq!(order.discount_amount, d("49500"));
        assert_eq!(order.final_amount, d("49500"));

        let settled = checkout
            .settle_order(&order.id, OrderStatus::Paid, TimeMs::new(MS_PER_DAY))
            .await
            .unwrap();
        assert!(settled.applied);
        assert_eq!(settled.order.status, OrderStatus::Paid);
        assert_eq!(
            settled.subscription_expires_at,
            Some(TimeMs::new(31 * MS_PER_DAY))
        );

        let sub = repo.get_subscription(&user).await.unwrap().unwrap();
        assert_eq!(sub.expires_at, TimeMs::new(31 * MS_PER_DAY));

        // Coupon is now used up.
        assert!(matches!(
            checkout.quote("PRO_MONTHLY", Some("HALF"), TimeMs::new(0)).await,
            Err(CheckoutError::CouponRejected {
                reason: DiscountRejection::UsageLimitReached,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_repeated_paid_is_noop() {
        let (checkout, repo, _temp) = checkout().await;
        let user = UserId::new("user-2".to_string());
        let order = checkout
            .create_order(user.clone(), "PRO_MONTHLY", None, PaymentMethod::Gateway, TimeMs::new(0))
            .await
            .unwrap();

        checkout
            .settle_order(&order.id, OrderStatus::Paid, TimeMs::new(0))
            .await
            .unwrap();
        let again = checkout
            .settle_order(&order.id, OrderStatus::Paid, TimeMs::new(5))
            .await
            .unwrap();
        assert!(!again.applied);
        assert_eq!(again.subscription_expires_at, None);

        let sub = repo.get_subscription(&user).await.unwrap().unwrap();
        assert_eq!(sub.expires_at, TimeMs::new(30 * MS_PER_DAY));
    }

    #[tokio::test]
    async fn test_expired_order_cannot_be_paid() {
        let (checkout, repo, _temp) = checkout().await;
        let user = UserId::new("user-3".to_string());
        let order = checkout
            .create_order(user.clone(), "PRO_MONTHLY", None, PaymentMethod::Gateway, TimeMs::new(0))
            .await
            .unwrap();

        let expired = checkout
            .settle_order(&order.id, OrderStatus::Expired, TimeMs::new(10))
            .await
            .unwrap();
        assert!(expired.applied);

        let err = checkout
            .settle_order(&order.id, OrderStatus::Paid, TimeMs::new(20))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidTransition(_)));
        assert_eq!(repo.get_subscription(&user).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_settle_unknown_order() {
        let (checkout, _repo, _temp) = checkout().await;
        assert!(matches!(
            checkout
                .settle_order("missing", OrderStatus::Paid, TimeMs::new(0))
                .await,
            Err(CheckoutError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_losing_settlement_reports_stored_status() {
        let (checkout, repo, _temp) = checkout().await;
        let user = UserId::new("user-4".to_string());
        let order = checkout
            .create_order(user.clone(), "PRO_MONTHLY", None, PaymentMethod::Gateway, TimeMs::new(0))
            .await
            .unwrap();
        let stale = order.clone();

        // A concurrent confirmation pays the order after `stale` was read.
        let expiry = repo
            .settle_paid_order(&order, 30, TimeMs::new(0))
            .await
            .unwrap();
        assert_eq!(expiry, Some(TimeMs::new(30 * MS_PER_DAY)));

        let err = checkout
            .settle_loaded(stale, OrderStatus::Failed, TimeMs::new(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InvalidTransition(OrderTransitionError::FromTerminal {
                from: OrderStatus::Paid,
                to: OrderStatus::Failed,
            })
        ));

        let stored = repo.get_order(&order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_losing_duplicate_payment_is_not_applied() {
        let (checkout, repo, _temp) = checkout().await;
        let user = UserId::new("user-5".to_string());
        let order = checkout
            .create_order(user.clone(), "PRO_MONTHLY", None, PaymentMethod::Gateway, TimeMs::new(0))
            .await
            .unwrap();
        let stale = order.clone();

        repo.settle_paid_order(&order, 30, TimeMs::new(0))
            .await
            .unwrap();

        let settlement = checkout
            .settle_loaded(stale, OrderStatus::Paid, TimeMs::new(5))
            .await
            .unwrap();
        assert!(!settlement.applied);
        assert_eq!(settlement.subscription_expires_at, None);
        assert_eq!(settlement.order.status, OrderStatus::Paid);

        let sub = repo.get_subscription(&user).await.unwrap().unwrap();
        assert_eq!(sub.expires_at, TimeMs::new(30 * MS_PER_DAY));
    }

    #[tokio::test]
    async fn test_settle_after_repo_payment_rejects_other_status() {
        let (checkout, repo, _temp) = checkout().await;
        let order = checkout
            .create_order(
                UserId::new("user-6".to_string()),
                "PRO_MONTHLY",
                None,
                PaymentMethod::BankTransfer,
                TimeMs::new(0),
            )
            .await
            .unwrap();
        repo.settle_paid_order(&order, 30, TimeMs::new(0))
            .await
            .unwrap();

        assert!(matches!(
            checkout
                .settle_order(&order.id, OrderStatus::Expired, TimeMs::new(1))
                .await,
            Err(CheckoutError::InvalidTransition(_))
        ));
    }
}
