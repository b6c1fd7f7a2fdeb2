use crate::domain::{
    models::tour::{Tour, TourDetails},
    ports::{Scope, TourRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const DETAILS_SELECT: &str = "SELECT t.*, p.title AS property_title, p.address AS property_address, c.name AS client_name, c.email AS client_email, a.name AS agent_name
     FROM tours t
     LEFT JOIN properties p ON p.id = t.property_id
     LEFT JOIN users c ON c.id = t.client_id
     LEFT JOIN users a ON a.id = t.agent_id";

pub struct SqliteTourRepo {
    pool: SqlitePool,
}

impl SqliteTourRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_scope<'a>(qb: &mut QueryBuilder<'a, Sqlite>, scope: Scope<'a>, status: Option<&'a str>) {
    qb.push(" WHERE 1 = 1");
    match scope {
        Scope::All => {}
        Scope::Agent(id) => { qb.push(" AND t.agent_id = ").push_bind(id); }
        Scope::Client(id) => { qb.push(" AND t.client_id = ").push_bind(id); }
    }
    if let Some(status) = status {
        qb.push(" AND t.status = ").push_bind(status);
    }
}

#[async_trait]
impl TourRepository for SqliteTourRepo {
    async fn create(&self, tour: &Tour) -> Result<Tour, AppError> {
        sqlx::query_as::<_, Tour>(
            "INSERT INTO tours (id, property_id, client_id, agent_id, scheduled_date, scheduled_time, status, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&tour.id)
            .bind(&tour.property_id)
            .bind(&tour.client_id)
            .bind(&tour.agent_id)
            .bind(tour.scheduled_date)
            .bind(&tour.scheduled_time)
            .bind(&tour.status)
            .bind(&tour.notes)
            .bind(tour.created_at)
            .bind(tour.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Tour>, AppError> {
        sqlx::query_as::<_, Tour>("SELECT * FROM tours WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, tour: &Tour) -> Result<Tour, AppError> {
        sqlx::query_as::<_, Tour>(
            "UPDATE tours SET scheduled_date = ?, scheduled_time = ?, status = ?, notes = ?, updated_at = ? WHERE id = ? RETURNING *"
        )
            .bind(tour.scheduled_date)
            .bind(&tour.scheduled_time)
            .bind(&tour.status)
            .bind(&tour.notes)
            .bind(tour.updated_at)
            .bind(&tour.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Tour not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tours WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tour not found".into()));
        }
        Ok(())
    }

    async fn list(&self, scope: Scope<'_>, status: Option<&str>) -> Result<Vec<TourDetails>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new(DETAILS_SELECT);
        push_scope(&mut qb, scope, status);
        qb.push(" ORDER BY t.scheduled_date ASC, t.scheduled_time ASC");

        qb.build_query_as::<TourDetails>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self, scope: Scope<'_>, status: Option<&str>) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM tours t");
        push_scope(&mut qb, scope, status);

        qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn is_agent_booked(&self, agent_id: &str, date: NaiveDate, time: &str) -> Result<bool, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tours WHERE agent_id = ? AND scheduled_date = ? AND scheduled_time = ? AND status = 'scheduled'"
        )
            .bind(agent_id)
            .bind(date)
            .bind(time)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(count > 0)
    }
}
