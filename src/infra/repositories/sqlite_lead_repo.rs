use crate::domain::{models::lead::Lead, ports::LeadRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteLeadRepo {
    pool: SqlitePool,
}

impl SqliteLeadRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for SqliteLeadRepo {
    async fn create(&self, lead: &Lead) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(
            "INSERT INTO leads (id, name, email, phone, message, source, status, property_id, agent_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&lead.id)
            .bind(&lead.name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(&lead.message)
            .bind(&lead.source)
            .bind(&lead.status)
            .bind(&lead.property_id)
            .bind(&lead.agent_id)
            .bind(lead.created_at)
            .bind(lead.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lead>, AppError> {
        sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, lead: &Lead) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(
            "UPDATE leads SET status = ?, agent_id = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(&lead.status)
            .bind(&lead.agent_id)
            .bind(lead.updated_at)
            .bind(&lead.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Lead not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Lead not found".into()));
        }
        Ok(())
    }

    async fn list(&self, status: Option<&str>, agent_id: Option<&str>) -> Result<Vec<Lead>, AppError> {
        sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE (? IS NULL OR status = ?) AND (? IS NULL OR agent_id = ?) ORDER BY created_at DESC"
        )
            .bind(status)
            .bind(status)
            .bind(agent_id)
            .bind(agent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, status: Option<&str>, agent_id: Option<&str>) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leads WHERE (? IS NULL OR status = ?) AND (? IS NULL OR agent_id = ?)"
        )
            .bind(status)
            .bind(status)
            .bind(agent_id)
            .bind(agent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
