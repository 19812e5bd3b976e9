//! Subscription lookups for the repository.

use crate::domain::{Subscription, TimeMs, UserId};
use sqlx::Row;

use super::Repository;

impl Repository {
    /// Current subscription for a user, active or lapsed.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_subscription(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT user_id, plan_code, expires_at_ms FROM subscriptions WHERE user_id = ?",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Subscription {
            user_id: UserId::new(r.get("user_id")),
            plan_code: r.get("plan_code"),
            expires_at: TimeMs::new(r.get("expires_at_ms")),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repo::test_support::repo;

    #[tokio::test]
    async fn test_no_subscription() {
        let (repo, _temp) = repo().await;
        let user = UserId::new("nobody".to_string());
        assert_eq!(repo.get_subscription(&user).await.unwrap(), None);
    }
}
