use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, description: Option<String>) -> Self {
        let slug = slugify(&name);
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            description,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Luxury Villas"), "luxury-villas");
        assert_eq!(slugify("  Beach & Lake -- Homes! "), "beach-lake-homes");
        assert_eq!(slugify("Condo"), "condo");
    }
}
