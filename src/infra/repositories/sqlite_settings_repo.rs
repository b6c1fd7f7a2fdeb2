use crate::domain::{models::settings::{SiteSettings, SETTINGS_ID}, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
    async fn get(&self) -> Result<SiteSettings, AppError> {
        let stored = sqlx::query_as::<_, SiteSettings>("SELECT * FROM site_settings WHERE id = ?")
            .bind(SETTINGS_ID)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(stored.unwrap_or_default())
    }

    async fn save(&self, s: &SiteSettings) -> Result<SiteSettings, AppError> {
        sqlx::query_as::<_, SiteSettings>(
            "INSERT INTO site_settings (id, site_name, contact_email, contact_phone, address, currency, maintenance_mode, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                site_name = excluded.site_name,
                contact_email = excluded.contact_email,
                contact_phone = excluded.contact_phone,
                address = excluded.address,
                currency = excluded.currency,
                maintenance_mode = excluded.maintenance_mode,
                updated_at = excluded.updated_at
             RETURNING *"
        )
            .bind(SETTINGS_ID)
            .bind(&s.site_name)
            .bind(&s.contact_email)
            .bind(&s.contact_phone)
            .bind(&s.address)
            .bind(&s.currency)
            .bind(s.maintenance_mode)
            .bind(s.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
