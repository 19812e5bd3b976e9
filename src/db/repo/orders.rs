//! Order intake and settlement for the repository.

use crate::domain::subscription::extend_expiry;
use crate::domain::{Order, OrderClosure, OrderStatus, PaymentMethod, TimeMs, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{decimal_column, unknown_value, Repository};

const ORDER_COLUMNS: &str = r#"
    id, user_id, plan_code, coupon_code, payment_method, base_amount, discount_amount,
    final_amount, status, created_at_ms, settled_at_ms
"#;

impl Repository {
    /// Persist a new order.
    ///
    /// # Errors
    /// Returns an error if the insert fails (including a duplicate id).
    pub async fn insert_order(&self, order: &Order) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, plan_code, coupon_code, payment_method, base_amount,
                discount_amount, final_amount, status, created_at_ms, settled_at_ms
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.id)
        .bind(order.user_id.as_str())
        .bind(&order.plan_code)
        .bind(order.coupon_code.as_deref())
        .bind(order.payment_method.as_str())
        .bind(order.base_amount.to_canonical_string())
        .bind(order.discount_amount.to_canonical_string())
        .bind(order.final_amount.to_canonical_string())
        .bind(order.status.as_str())
        .bind(order.created_at.as_i64())
        .bind(order.settled_at.map(|t| t.as_i64()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch an order by id.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored enum is unknown.
    pub async fn get_order(&self, id: &str) -> Result<Option<Order>, sqlx::Error> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| order_from_row(&r)).transpose()
    }

    /// A user's orders, newest first.
    pub async fn list_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = ? ORDER BY created_at_ms DESC, id ASC",
            ORDER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(order_from_row).collect()
    }

    /// Move a PENDING order to EXPIRED or FAILED.
    ///
    /// Returns false if the order was no longer PENDING.
    pub async fn close_pending_order(
        &self,
        id: &str,
        closure: OrderClosure,
        at: TimeMs,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?, settled_at_ms = ? WHERE id = ? AND status = 'PENDING'",
        )
        .bind(closure.status().as_str())
        .bind(at.as_i64())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Mark a PENDING order PAID and fulfil it in one transaction.
    ///
    /// Fulfilment bumps the coupon's `used_count` and extends the user's
    /// subscription by `duration_days`. Returns the new expiry, or `None` if
    /// the order was no longer PENDING (nothing is changed in that case).
    pub async fn settle_paid_order(
        &self,
        order: &Order,
        duration_days: i64,
        at: TimeMs,
    ) -> Result<Option<TimeMs>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Write first so the transaction holds the lock before reading the subscription.
        let result = sqlx::query(
            "UPDATE orders SET status = 'PAID', settled_at_ms = ? WHERE id = ? AND status = 'PENDING'",
        )
        .bind(at.as_i64())
        .bind(&order.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        if let Some(code) = order.coupon_code.as_deref() {
            sqlx::query("UPDATE coupons SET used_count = used_count + 1 WHERE code = ?")
                .bind(code)
                .execute(&mut *tx)
                .await?;
        }

        let current: Option<i64> =
            sqlx::query("SELECT expires_at_ms FROM subscriptions WHERE user_id = ?")
                .bind(order.user_id.as_str())
                .fetch_optional(&mut *tx)
                .await?
                .map(|r| r.get("expires_at_ms"));

        let expires_at = extend_expiry(current.map(TimeMs::new), at, duration_days);

        sqlx::query(
            r#"
            INSERT INTO subscriptions (user_id, plan_code, expires_at_ms, updated_at_ms)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                plan_code = excluded.plan_code,
                expires_at_ms = excluded.expires_at_ms,
                updated_at_ms = excluded.updated_at_ms
            "#,
        )
        .bind(order.user_id.as_str())
        .bind(&order.plan_code)
        .bind(expires_at.as_i64())
        .bind(at.as_i64())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(expires_at))
    }
}

fn order_from_row(row: &SqliteRow) -> Result<Order, sqlx::Error> {
    let id: String = row.get("id");

    let status_str: String = row.get("status");
    let status =
        OrderStatus::parse(&status_str).ok_or_else(|| unknown_value("status", &status_str))?;
    let method_str: String = row.get("payment_method");
    let payment_method = PaymentMethod::parse(&method_str)
        .ok_or_else(|| unknown_value("payment_method", &method_str))?;

    Ok(Order {
        user_id: UserId::new(row.get("user_id")),
        plan_code: row.get("plan_code"),
        coupon_code: row.get("coupon_code"),
        payment_method,
        base_amount: decimal_column(row, "base_amount", &id),
        discount_amount: decimal_column(row, "discount_amount", &id),
        final_amount: decimal_column(row, "final_amount", &id),
        status,
        created_at: TimeMs::new(row.get("created_at_ms")),
        settled_at: row.get::<Option<i64>, _>("settled_at_ms").map(TimeMs::new),
        id,
    })
}
