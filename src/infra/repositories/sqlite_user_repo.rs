use crate::domain::{models::{notification::Notification, user::User}, ports::{AgentReviewState, UserRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::error;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, phone, avatar, is_active, agent_profile, client_profile, created_at, updated_at";

// json_extract yields 1/0 for JSON true/false.
fn agent_state_clause(state: AgentReviewState) -> &'static str {
    match state {
        AgentReviewState::Pending => "is_active = 1 AND COALESCE(json_extract(agent_profile, '$.is_verified'), 0) = 0",
        AgentReviewState::Verified => "is_active = 1 AND json_extract(agent_profile, '$.is_verified') = 1",
        AgentReviewState::Rejected => "is_active = 0",
    }
}

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.role)
            .bind(&user.phone)
            .bind(&user.avatar)
            .bind(user.is_active)
            .bind(&user.agent_profile)
            .bind(&user.client_profile)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = ?, phone = ?, avatar = ?, is_active = ?, agent_profile = ?, client_profile = ?, password_hash = ?, updated_at = ?
             WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
            .bind(&user.name)
            .bind(&user.phone)
            .bind(&user.avatar)
            .bind(user.is_active)
            .bind(&user.agent_profile)
            .bind(&user.client_profile)
            .bind(&user.password_hash)
            .bind(user.updated_at)
            .bind(&user.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("User not found".into()))
    }

    async fn update_with_notification(&self, user: &User, notification: &Notification) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = ?, phone = ?, avatar = ?, is_active = ?, agent_profile = ?, client_profile = ?, password_hash = ?, updated_at = ?
             WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
            .bind(&user.name)
            .bind(&user.phone)
            .bind(&user.avatar)
            .bind(user.is_active)
            .bind(&user.agent_profile)
            .bind(&user.client_profile)
            .bind(&user.password_hash)
            .bind(user.updated_at)
            .bind(&user.id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("User not found".into()))?;

        sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, title, message, is_read, link, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
            .bind(&notification.id)
            .bind(&notification.user_id)
            .bind(&notification.kind)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.is_read)
            .bind(&notification.link)
            .bind(notification.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Notification insert for user {} failed, rolling back: {:?}", user.id, e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite User Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }

    async fn list_agents(&self, state: Option<AgentReviewState>) -> Result<Vec<User>, AppError> {
        let filter = state.map(agent_state_clause).unwrap_or("1 = 1");
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'agent' AND {filter} ORDER BY created_at DESC"
        ))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_role(&self, role: &str) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = ? ORDER BY created_at DESC"
        ))
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_role(&self, role: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_agents(&self, state: AgentReviewState) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM users WHERE role = 'agent' AND {}", agent_state_clause(state)
        ))
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
