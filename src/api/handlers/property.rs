use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{
    requests::{CreatePropertyRequest, PropertyQuery, UpdatePropertyRequest},
    responses::{ApiResponse, Pagination},
};
use crate::api::extractors::auth::{ActiveUser, AuthUser};
use crate::domain::models::{
    auth::CurrentUser,
    property::{is_valid_status, is_valid_type, NewPropertyParams, Property, PropertyFilter},
    role::Role,
    user::UserSummary,
};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use serde::Serialize;
use sqlx::types::Json as SqlJson;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Serialize)]
pub struct PropertyWithAgent {
    #[serde(flatten)]
    pub property: Property,
    pub agent: Option<UserSummary>,
}

async fn search_page(
    state: &AppState,
    filter: PropertyFilter,
    query: &PropertyQuery,
) -> Result<ApiResponse<Vec<Property>>, AppError> {
    let (page, limit) = query.paging();
    let sort = query.sort.unwrap_or_default();
    let (items, total) = state.property_repo.search(&filter, sort, limit, (page - 1) * limit).await?;
    Ok(ApiResponse::data(items).with_pagination(Pagination::new(page, limit, total)))
}

pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PropertyQuery>,
) -> Result<impl IntoResponse, AppError> {
    search_page(&state, query.filter(), &query).await
}

/// Public detail view. Each read counts as a view.
pub async fn get_property(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut property = state.property_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    state.property_repo.increment_views(&id).await?;
    property.views += 1;

    let agent = state.user_repo.find_by_id(&property.agent_id).await?
        .map(|u| UserSummary::from(&u));
    Ok(ApiResponse::data(PropertyWithAgent { property, agent }))
}

pub async fn list_agent_properties(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Query(query): Query<PropertyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut filter = query.filter();
    filter.agent_id = Some(current.id);
    search_page(&state, filter, &query).await
}

pub async fn list_all_properties(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PropertyQuery>,
) -> Result<impl IntoResponse, AppError> {
    search_page(&state, query.filter(), &query).await
}

pub async fn create_property(
    State(state): State<Arc<AppState>>,
    ActiveUser(current): ActiveUser,
    JsonBody(payload): JsonBody<CreatePropertyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let status = payload.status.unwrap_or_else(|| "For Sale".to_string());
    validate_listing(&payload.title, payload.price, &payload.property_type, &status)?;
    if payload.address.trim().is_empty() || payload.city.trim().is_empty() {
        return Err(AppError::Validation("Address and city are required".into()));
    }
    if let Some(category_id) = &payload.category_id {
        ensure_category(&state, category_id).await?;
    }

    let property = Property::new(NewPropertyParams {
        title: payload.title.trim().to_string(),
        description: payload.description,
        price: payload.price,
        property_type: payload.property_type,
        status,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip_code: payload.zip_code,
        bedrooms: payload.bedrooms.unwrap_or(0).max(0),
        bathrooms: payload.bathrooms.unwrap_or(0).max(0),
        area_sqft: payload.area_sqft,
        category_id: payload.category_id,
        features: payload.features,
        images: payload.images,
        agent_id: current.id,
    });

    let created = state.property_repo.create(&property).await?;
    info!("Agent {} listed property {}", created.agent_id, created.id);
    Ok((StatusCode::CREATED, ApiResponse::data(created).with_message("Property created")))
}

/// Shared by the agent and admin routes. Agents may only touch their own listings
/// and can never change the featured flag.
pub async fn update_property(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdatePropertyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut property = state.property_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    let is_admin = current.role == Role::Admin.as_str();
    ensure_owner(&current, &property.agent_id, is_admin)?;

    if let Some(category_id) = &payload.category_id {
        ensure_category(&state, category_id).await?;
    }
    apply_update(&mut property, payload, is_admin);
    validate_listing(&property.title, property.price, &property.property_type, &property.status)?;

    property.updated_at = Utc::now();
    let updated = state.property_repo.update(&property).await?;
    info!("Property {} updated by {}", updated.id, current.id);
    Ok(ApiResponse::data(updated).with_message("Property updated"))
}

pub async fn delete_property(
    State(state): State<Arc<AppState>>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.property_repo.delete(&id).await?;
    info!("Property {} deleted by {}", id, current.id);
    Ok(ApiResponse::message("Property deleted"))
}

fn ensure_owner(current: &CurrentUser, agent_id: &str, is_admin: bool) -> Result<(), AppError> {
    if !is_admin && current.id != agent_id {
        warn!("User {} tried to modify property owned by {}", current.id, agent_id);
        return Err(AppError::Forbidden("You can only manage your own listings".into()));
    }
    Ok(())
}

async fn ensure_category(state: &AppState, category_id: &str) -> Result<(), AppError> {
    state.category_repo.find_by_id(category_id).await?
        .ok_or(AppError::Validation("Unknown category".into()))?;
    Ok(())
}

fn validate_listing(title: &str, price: f64, property_type: &str, status: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(AppError::Validation("Price must be greater than zero".into()));
    }
    if !is_valid_type(property_type) {
        return Err(AppError::Validation(format!("Unknown property type: {}", property_type)));
    }
    if !is_valid_status(status) {
        return Err(AppError::Validation(format!("Unknown property status: {}", status)));
    }
    Ok(())
}

fn apply_update(p: &mut Property, u: UpdatePropertyRequest, is_admin: bool) {
    if let Some(v) = u.title { p.title = v.trim().to_string(); }
    if let Some(v) = u.description { p.description = v; }
    if let Some(v) = u.price { p.price = v; }
    if let Some(v) = u.property_type { p.property_type = v; }
    if let Some(v) = u.status { p.status = v; }
    if let Some(v) = u.address { p.address = v; }
    if let Some(v) = u.city { p.city = v; }
    if u.state.is_some() { p.state = u.state; }
    if u.zip_code.is_some() { p.zip_code = u.zip_code; }
    if let Some(v) = u.bedrooms { p.bedrooms = v.max(0); }
    if let Some(v) = u.bathrooms { p.bathrooms = v.max(0); }
    if u.area_sqft.is_some() { p.area_sqft = u.area_sqft; }
    if u.category_id.is_some() { p.category_id = u.category_id; }
    if let Some(v) = u.features { p.features = SqlJson(v); }
    if let Some(v) = u.images { p.images = SqlJson(v); }
    if is_admin && let Some(v) = u.is_featured {
        p.is_featured = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Property {
        Property::new(NewPropertyParams {
            title: "Loft".into(),
            description: "Bright".into(),
            price: 250_000.0,
            property_type: "Apartment".into(),
            status: "For Sale".into(),
            address: "1 Main St".into(),
            city: "Austin".into(),
            state: None,
            zip_code: None,
            bedrooms: 2,
            bathrooms: 1,
            area_sqft: None,
            category_id: None,
            features: vec![],
            images: vec![],
            agent_id: "agent-1".into(),
        })
    }

    #[test]
    fn test_agent_cannot_feature_listing() {
        let mut p = sample();
        apply_update(&mut p, UpdatePropertyRequest { is_featured: Some(true), price: Some(1.0), ..Default::default() }, false);
        assert!(!p.is_featured);
        assert_eq!(p.price, 1.0);

        apply_update(&mut p, UpdatePropertyRequest { is_featured: Some(true), ..Default::default() }, true);
        assert!(p.is_featured);
    }

    #[test]
    fn test_listing_validation() {
        assert!(validate_listing("Loft", 10.0, "Apartment", "For Sale").is_ok());
        assert!(validate_listing("", 10.0, "Apartment", "For Sale").is_err());
        assert!(validate_listing("Loft", 0.0, "Apartment", "For Sale").is_err());
        assert!(validate_listing("Loft", 10.0, "Castle", "For Sale").is_err());
        assert!(validate_listing("Loft", 10.0, "House", "Gone").is_err());
    }
}
