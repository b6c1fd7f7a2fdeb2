use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const SETTINGS_ID: &str = "site";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SiteSettings {
    #[serde(skip)]
    pub id: String,
    pub site_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub currency: String,
    pub maintenance_mode: bool,
    pub updated_at: DateTime<Utc>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            id: SETTINGS_ID.to_string(),
            site_name: "MetroNest".to_string(),
            contact_email: None,
            contact_phone: None,
            address: None,
            currency: "USD".to_string(),
            maintenance_mode: false,
            updated_at: Utc::now(),
        }
    }
}
