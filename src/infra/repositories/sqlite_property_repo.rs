use crate::domain::{
    models::property::{Property, PropertyFilter, PropertySort},
    ports::PropertyRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqlitePropertyRepo {
    pool: SqlitePool,
}

impl SqlitePropertyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, filter: &'a PropertyFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(keyword) = filter.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        let pattern = format!("%{}%", keyword.to_lowercase());
        qb.push(" AND (LOWER(title) LIKE ").push_bind(pattern.clone())
            .push(" OR LOWER(description) LIKE ").push_bind(pattern.clone())
            .push(" OR LOWER(address) LIKE ").push_bind(pattern)
            .push(")");
    }
    if let Some(city) = filter.city.as_deref().filter(|c| !c.is_empty()) {
        qb.push(" AND LOWER(city) = LOWER(").push_bind(city).push(")");
    }
    if let Some(property_type) = filter.property_type.as_deref().filter(|t| !t.is_empty()) {
        qb.push(" AND property_type = ").push_bind(property_type);
    }
    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(category_id) = filter.category_id.as_deref().filter(|c| !c.is_empty()) {
        qb.push(" AND category_id = ").push_bind(category_id);
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND price <= ").push_bind(max);
    }
    if let Some(beds) = filter.min_bedrooms {
        qb.push(" AND bedrooms >= ").push_bind(beds);
    }
    if let Some(featured) = filter.featured {
        qb.push(" AND is_featured = ").push_bind(featured);
    }
    if let Some(agent_id) = filter.agent_id.as_deref() {
        qb.push(" AND agent_id = ").push_bind(agent_id);
    }
}

#[async_trait]
impl PropertyRepository for SqlitePropertyRepo {
    async fn create(&self, p: &Property) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(
            "INSERT INTO properties (id, title, description, price, property_type, status, address, city, state, zip_code, bedrooms, bathrooms, area_sqft, category_id, features, images, agent_id, is_featured, views, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&p.id).bind(&p.title).bind(&p.description).bind(p.price)
            .bind(&p.property_type).bind(&p.status).bind(&p.address).bind(&p.city)
            .bind(&p.state).bind(&p.zip_code).bind(p.bedrooms).bind(p.bathrooms)
            .bind(p.area_sqft).bind(&p.category_id).bind(&p.features).bind(&p.images)
            .bind(&p.agent_id).bind(p.is_featured).bind(p.views).bind(p.created_at).bind(p.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>, AppError> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, p: &Property) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(
            "UPDATE properties SET title = ?, description = ?, price = ?, property_type = ?, status = ?, address = ?, city = ?, state = ?, zip_code = ?,
                bedrooms = ?, bathrooms = ?, area_sqft = ?, category_id = ?, features = ?, images = ?, is_featured = ?, updated_at = ?
             WHERE id = ? RETURNING *"
        )
            .bind(&p.title).bind(&p.description).bind(p.price).bind(&p.property_type)
            .bind(&p.status).bind(&p.address).bind(&p.city).bind(&p.state).bind(&p.zip_code)
            .bind(p.bedrooms).bind(p.bathrooms).bind(p.area_sqft).bind(&p.category_id)
            .bind(&p.features).bind(&p.images).bind(p.is_featured).bind(p.updated_at)
            .bind(&p.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Property not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Property not found".into()));
        }
        Ok(())
    }

    async fn search(&self, filter: &PropertyFilter, sort: PropertySort, limit: i64, offset: i64) -> Result<(Vec<Property>, i64), AppError> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM properties");
        push_filters(&mut count_qb, filter);
        let total = count_qb.build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM properties");
        push_filters(&mut qb, filter);
        qb.push(match sort {
            PropertySort::Newest => " ORDER BY is_featured DESC, created_at DESC",
            PropertySort::PriceAsc => " ORDER BY price ASC",
            PropertySort::PriceDesc => " ORDER BY price DESC",
        });
        qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);

        let items = qb.build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok((items, total))
    }

    async fn increment_views(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE properties SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn count(&self, agent_id: Option<&str>) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM properties WHERE ? IS NULL OR agent_id = ?")
            .bind(agent_id)
            .bind(agent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn total_views(&self, agent_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(views), 0) FROM properties WHERE agent_id = ?")
            .bind(agent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
