//! Plan and coupon operations for the repository.

use crate::domain::{Discount, DiscountKind, Plan, TimeMs};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{decimal_column, unknown_value, Repository};

impl Repository {
    /// Look up a plan by code.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_plan(&self, code: &str) -> Result<Option<Plan>, sqlx::Error> {
        let row = sqlx::query("SELECT code, name, price, duration_days FROM plans WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| plan_from_row(&r)))
    }

    /// All plans, cheapest first.
    pub async fn list_plans(&self) -> Result<Vec<Plan>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT code, name, price, duration_days FROM plans ORDER BY duration_days ASC, code ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(plan_from_row).collect())
    }

    /// Insert or replace a plan.
    pub async fn upsert_plan(&self, plan: &Plan) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO plans (code, name, price, duration_days)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(code) DO UPDATE SET
                name = excluded.name,
                price = excluded.price,
                duration_days = excluded.duration_days
            "#,
        )
        .bind(&plan.code)
        .bind(&plan.name)
        .bind(plan.price.to_canonical_string())
        .bind(plan.duration_days)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up a coupon by code. Codes are matched case-insensitively.
    ///
    /// # Errors
    /// Returns an error if the query fails or the stored kind is unknown.
    pub async fn get_coupon(&self, code: &str) -> Result<Option<Discount>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT code, kind, magnitude, max_uses, used_count, expires_at_ms, active
            FROM coupons
            WHERE code = ?
            "#,
        )
        .bind(normalize_code(code))
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| coupon_from_row(&r)).transpose()
    }

    /// Insert or replace a coupon, keeping its stored `used_count`.
    pub async fn upsert_coupon(&self, coupon: &Discount) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO coupons (code, kind, magnitude, max_uses, used_count, expires_at_ms, active)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(code) DO UPDATE SET
                kind = excluded.kind,
                magnitude = excluded.magnitude,
                max_uses = excluded.max_uses,
                expires_at_ms = excluded.expires_at_ms,
                active = excluded.active
            "#,
        )
        .bind(normalize_code(&coupon.code))
        .bind(coupon.kind.as_str())
        .bind(coupon.magnitude.to_canonical_string())
        .bind(coupon.max_uses)
        .bind(coupon.used_count)
        .bind(coupon.expires_at.map(|t| t.as_i64()))
        .bind(coupon.active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

pub(super) fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

fn plan_from_row(row: &SqliteRow) -> Plan {
    let code: String = row.get("code");
    let price = decimal_column(row, "price", &code);
    Plan {
        name: row.get("name"),
        price,
        duration_days: row.get("duration_days"),
        code,
    }
}

fn coupon_from_row(row: &SqliteRow) -> Result<Discount, sqlx::Error> {
    let code: String = row.get("code");
    let kind_str: String = row.get("kind");
    let kind = DiscountKind::parse(&kind_str).ok_or_else(|| unknown_value("kind", &kind_str))?;

    Ok(Discount {
        magnitude: decimal_column(row, "magnitude", &code),
        kind,
        max_uses: row.get("max_uses"),
        used_count: row.get("used_count"),
        expires_at: row.get::<Option<i64>, _>("expires_at_ms").map(TimeMs::new),
        active: row.get("active"),
        code,
    })
}
