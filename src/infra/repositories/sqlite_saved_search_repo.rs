use crate::domain::{models::saved_search::SavedSearch, ports::SavedSearchRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSavedSearchRepo {
    pool: SqlitePool,
}

impl SqliteSavedSearchRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SavedSearchRepository for SqliteSavedSearchRepo {
    async fn create(&self, search: &SavedSearch) -> Result<SavedSearch, AppError> {
        sqlx::query_as::<_, SavedSearch>(
            "INSERT INTO saved_searches (id, user_id, name, criteria, alerts_enabled, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&search.id)
            .bind(&search.user_id)
            .bind(&search.name)
            .bind(&search.criteria)
            .bind(search.alerts_enabled)
            .bind(search.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<SavedSearch>, AppError> {
        sqlx::query_as::<_, SavedSearch>("SELECT * FROM saved_searches WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM saved_searches WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Saved search not found".into()));
        }
        Ok(())
    }

    async fn count_by_user(&self, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM saved_searches WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
