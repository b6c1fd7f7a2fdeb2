use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

pub const PROPERTY_STATUSES: [&str; 5] = ["For Sale", "For Rent", "Sold", "Rented", "Pending"];
pub const PROPERTY_TYPES: [&str; 6] = ["House", "Apartment", "Condo", "Villa", "Land", "Commercial"];

pub fn is_valid_status(status: &str) -> bool {
    PROPERTY_STATUSES.contains(&status)
}

pub fn is_valid_type(property_type: &str) -> bool {
    PROPERTY_TYPES.contains(&property_type)
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub property_type: String,
    pub status: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area_sqft: Option<f64>,
    pub category_id: Option<String>,
    pub features: Json<Vec<String>>,
    pub images: Json<Vec<String>>,
    pub agent_id: String,
    pub is_featured: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewPropertyParams {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub property_type: String,
    pub status: String,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area_sqft: Option<f64>,
    pub category_id: Option<String>,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub agent_id: String,
}

impl Property {
    pub fn new(params: NewPropertyParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: params.title,
            description: params.description,
            price: params.price,
            property_type: params.property_type,
            status: params.status,
            address: params.address,
            city: params.city,
            state: params.state,
            zip_code: params.zip_code,
            bedrooms: params.bedrooms,
            bathrooms: params.bathrooms,
            area_sqft: params.area_sqft,
            category_id: params.category_id,
            features: Json(params.features),
            images: Json(params.images),
            agent_id: params.agent_id,
            is_featured: false,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertySort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

/// Listing query used by the public catalogue, admin listing and saved searches.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PropertyFilter {
    pub keyword: Option<String>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<i32>,
    pub featured: Option<bool>,
    pub agent_id: Option<String>,
}
