use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const LEAD_SOURCES: [&str; 4] = ["contact", "property", "newsletter", "other"];
pub const LEAD_STATUSES: [&str; 4] = ["new", "contacted", "qualified", "closed"];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source: String,
    pub status: String,
    pub property_id: Option<String>,
    pub agent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewLeadParams {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub source: String,
    pub property_id: Option<String>,
    pub agent_id: Option<String>,
}

impl Lead {
    pub fn new(params: NewLeadParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            email: params.email.trim().to_lowercase(),
            phone: params.phone,
            message: params.message,
            source: params.source,
            status: "new".to_string(),
            property_id: params.property_id,
            agent_id: params.agent_id,
            created_at: now,
            updated_at: now,
        }
    }
}
