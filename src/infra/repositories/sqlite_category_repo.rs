use crate::domain::{models::category::Category, ports::CategoryRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCategoryRepo {
    pool: SqlitePool,
}

impl SqliteCategoryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepo {
    async fn create(&self, category: &Category) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name, slug, description, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(category.is_active)
            .bind(category.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, category: &Category) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = ?, slug = ?, description = ?, is_active = ? WHERE id = ? RETURNING *"
        )
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(category.is_active)
            .bind(&category.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Category not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".into()));
        }
        Ok(())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE (? = 0 OR is_active = 1) ORDER BY name ASC"
        )
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
