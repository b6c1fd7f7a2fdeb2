use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use super::property::PropertyFilter;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SavedSearch {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub criteria: Json<PropertyFilter>,
    pub alerts_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn new(user_id: String, name: String, mut criteria: PropertyFilter, alerts_enabled: bool) -> Self {
        // A saved search never pins a specific agent.
        criteria.agent_id = None;
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name,
            criteria: Json(criteria),
            alerts_enabled,
            created_at: Utc::now(),
        }
    }
}
