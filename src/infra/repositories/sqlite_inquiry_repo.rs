use crate::domain::{
    models::inquiry::{Inquiry, InquiryDetails},
    ports::{InquiryRepository, Scope},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const DETAILS_SELECT: &str = "SELECT i.*, p.title AS property_title, c.name AS client_name, c.email AS client_email, a.name AS agent_name
     FROM inquiries i
     LEFT JOIN properties p ON p.id = i.property_id
     LEFT JOIN users c ON c.id = i.client_id
     LEFT JOIN users a ON a.id = i.agent_id";

pub struct SqliteInquiryRepo {
    pool: SqlitePool,
}

impl SqliteInquiryRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_scope<'a>(qb: &mut QueryBuilder<'a, Sqlite>, scope: Scope<'a>, status: Option<&'a str>) {
    qb.push(" WHERE 1 = 1");
    match scope {
        Scope::All => {}
        Scope::Agent(id) => { qb.push(" AND i.agent_id = ").push_bind(id); }
        Scope::Client(id) => { qb.push(" AND i.client_id = ").push_bind(id); }
    }
    if let Some(status) = status {
        qb.push(" AND i.status = ").push_bind(status);
    }
}

#[async_trait]
impl InquiryRepository for SqliteInquiryRepo {
    async fn create(&self, inquiry: &Inquiry) -> Result<Inquiry, AppError> {
        sqlx::query_as::<_, Inquiry>(
            "INSERT INTO inquiries (id, property_id, client_id, agent_id, message, status, agent_response, responded_at, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&inquiry.id)
            .bind(&inquiry.property_id)
            .bind(&inquiry.client_id)
            .bind(&inquiry.agent_id)
            .bind(&inquiry.message)
            .bind(&inquiry.status)
            .bind(&inquiry.agent_response)
            .bind(inquiry.responded_at)
            .bind(inquiry.created_at)
            .bind(inquiry.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>, AppError> {
        sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, inquiry: &Inquiry) -> Result<Inquiry, AppError> {
        sqlx::query_as::<_, Inquiry>(
            "UPDATE inquiries SET status = ?, agent_response = ?, responded_at = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(&inquiry.status)
            .bind(&inquiry.agent_response)
            .bind(inquiry.responded_at)
            .bind(inquiry.updated_at)
            .bind(&inquiry.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Inquiry not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inquiry not found".into()));
        }
        Ok(())
    }

    async fn list(&self, scope: Scope<'_>, status: Option<&str>) -> Result<Vec<InquiryDetails>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new(DETAILS_SELECT);
        push_scope(&mut qb, scope, status);
        qb.push(" ORDER BY i.created_at DESC");

        qb.build_query_as::<InquiryDetails>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, scope: Scope<'_>, status: Option<&str>) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM inquiries i");
        push_scope(&mut qb, scope, status);

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
