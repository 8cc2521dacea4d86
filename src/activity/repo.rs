use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::activity::repo_types::{Activity, Category, NewActivity};
use crate::error::StoreError;

/// Append-only per-user activity rows.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn insert(&self, new: NewActivity) -> Result<Activity, StoreError>;
    /// Newest first, at most `limit` rows.
    async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<Activity>, StoreError>;
    async fn count_by_category(&self, user_id: Uuid, category: Category)
        -> Result<i64, StoreError>;
}

const RECENT_SQL: &str = r#"
    SELECT id, user_id, action, details, category, created_at
    FROM activities
    WHERE user_id = $1
    ORDER BY created_at DESC, id DESC
    LIMIT $2
"#;

fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return StoreError::UnknownUser;
        }
    }
    StoreError::Unavailable(err)
}

#[derive(Clone)]
pub struct PgActivityStore {
    db: PgPool,
}

impl PgActivityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityStore for PgActivityStore {
    async fn insert(&self, new: NewActivity) -> Result<Activity, StoreError> {
        let row = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (id, user_id, action, details, category)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, action, details, category, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.action)
        .bind(&new.details)
        .bind(new.category)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)?;
        Ok(row)
    }

    async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<Activity>, StoreError> {
        let rows = sqlx::query_as::<_, Activity>(RECENT_SQL)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn count_by_category(
        &self,
        user_id: Uuid,
        category: Category,
    ) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM activities
            WHERE user_id = $1 AND category = $2
            "#,
        )
        .bind(user_id)
        .bind(category)
        .fetch_one(&self.db)
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_order_has_a_tiebreaker() {
        assert!(RECENT_SQL.contains("ORDER BY created_at DESC, id DESC"));
    }

    #[test]
    fn non_database_insert_errors_are_unavailable() {
        assert!(matches!(
            map_insert_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }
}
