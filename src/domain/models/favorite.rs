use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use super::property::Property;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub property_id: String,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_id: String, property_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            property_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, FromRow, Clone)]
pub struct FavoriteWithProperty {
    pub favorite_id: String,
    pub favorited_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub property: Property,
}
