use crate::domain::{models::testimonial::Testimonial, ports::TestimonialRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteTestimonialRepo {
    pool: SqlitePool,
}

impl SqliteTestimonialRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TestimonialRepository for SqliteTestimonialRepo {
    async fn create(&self, t: &Testimonial) -> Result<Testimonial, AppError> {
        sqlx::query_as::<_, Testimonial>(
            "INSERT INTO testimonials (id, name, title, content, rating, avatar, is_approved, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&t.id)
            .bind(&t.name)
            .bind(&t.title)
            .bind(&t.content)
            .bind(t.rating)
            .bind(&t.avatar)
            .bind(t.is_approved)
            .bind(t.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Testimonial>, AppError> {
        sqlx::query_as::<_, Testimonial>("SELECT * FROM testimonials WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, t: &Testimonial) -> Result<Testimonial, AppError> {
        sqlx::query_as::<_, Testimonial>(
            "UPDATE testimonials SET name = ?, title = ?, content = ?, rating = ?, avatar = ?, is_approved = ? WHERE id = ? RETURNING *"
        )
            .bind(&t.name)
            .bind(&t.title)
            .bind(&t.content)
            .bind(t.rating)
            .bind(&t.avatar)
            .bind(t.is_approved)
            .bind(&t.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Testimonial not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Testimonial not found".into()));
        }
        Ok(())
    }

    async fn list(&self, approved_only: bool) -> Result<Vec<Testimonial>, AppError> {
        sqlx::query_as::<_, Testimonial>(
            "SELECT * FROM testimonials WHERE (? = 0 OR is_approved = 1) ORDER BY created_at DESC"
        )
            .bind(approved_only)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
