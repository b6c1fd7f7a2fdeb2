use crate::domain::{
    models::favorite::{Favorite, FavoriteWithProperty},
    ports::FavoriteRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteFavoriteRepo {
    pool: SqlitePool,
}

impl SqliteFavoriteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for SqliteFavoriteRepo {
    async fn create(&self, favorite: &Favorite) -> Result<Favorite, AppError> {
        sqlx::query_as::<_, Favorite>(
            "INSERT INTO favorites (id, user_id, property_id, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&favorite.id)
            .bind(&favorite.user_id)
            .bind(&favorite.property_id)
            .bind(favorite.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, user_id: &str, property_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND property_id = ?")
            .bind(user_id)
            .bind(property_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_with_properties(&self, user_id: &str) -> Result<Vec<FavoriteWithProperty>, AppError> {
        sqlx::query_as::<_, FavoriteWithProperty>(
            "SELECT f.id AS favorite_id, f.created_at AS favorited_at, p.*
             FROM favorites f
             JOIN properties p ON p.id = f.property_id
             WHERE f.user_id = ?
             ORDER BY f.created_at DESC"
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_user(&self, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM favorites WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
