use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse};
use crate::api::extractors::json::JsonBody;
use crate::api::dtos::{
    requests::{CreateCategoryRequest, CreateTestimonialRequest, UpdateCategoryRequest, UpdateSettingsRequest},
    responses::ApiResponse,
};
use crate::domain::models::{
    category::{slugify, Category},
    testimonial::Testimonial,
};
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ApiResponse::data(state.category_repo.list(true).await?))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.trim().to_string();
    if slugify(&name).is_empty() {
        return Err(AppError::Validation("Category name is required".into()));
    }

    let created = state.category_repo.create(&Category::new(name, payload.description)).await?;
    info!("Category {} created", created.slug);
    Ok((StatusCode::CREATED, ApiResponse::data(created)))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut category = state.category_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Category not found".into()))?;

    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(AppError::Validation("Category name is required".into()));
        }
        category.name = name;
        category.slug = slug;
    }
    if payload.description.is_some() {
        category.description = payload.description;
    }
    if let Some(active) = payload.is_active {
        category.is_active = active;
    }

    let updated = state.category_repo.update(&category).await?;
    Ok(ApiResponse::data(updated).with_message("Category updated"))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.category_repo.delete(&id).await?;
    info!("Category {} deleted", id);
    Ok(ApiResponse::message("Category deleted"))
}

pub async fn list_approved_testimonials(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ApiResponse::data(state.testimonial_repo.list(true).await?))
}

pub async fn list_all_testimonials(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ApiResponse::data(state.testimonial_repo.list(false).await?))
}

/// Public submission; stays hidden until an admin approves it.
pub async fn submit_testimonial(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateTestimonialRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(AppError::Validation("Name and content are required".into()));
    }
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::Validation("Rating must be between 1 and 5".into()));
    }

    let testimonial = Testimonial::new(
        payload.name.trim().to_string(),
        payload.title,
        payload.content.trim().to_string(),
        payload.rating,
        payload.avatar,
    );
    let created = state.testimonial_repo.create(&testimonial).await?;
    info!("Testimonial {} submitted", created.id);
    Ok((StatusCode::CREATED, ApiResponse::data(created).with_message("Thank you! Your testimonial will appear once reviewed.")))
}

pub async fn approve_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut testimonial = state.testimonial_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Testimonial not found".into()))?;
    testimonial.is_approved = true;
    let updated = state.testimonial_repo.update(&testimonial).await?;
    Ok(ApiResponse::data(updated).with_message("Testimonial approved"))
}

pub async fn delete_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.testimonial_repo.delete(&id).await?;
    Ok(ApiResponse::message("Testimonial deleted"))
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(ApiResponse::data(state.settings_repo.get().await?))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut settings = state.settings_repo.get().await?;

    if let Some(name) = payload.site_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Site name cannot be empty".into()));
        }
        settings.site_name = name.trim().to_string();
    }
    if payload.contact_email.is_some() { settings.contact_email = payload.contact_email; }
    if payload.contact_phone.is_some() { settings.contact_phone = payload.contact_phone; }
    if payload.address.is_some() { settings.address = payload.address; }
    if let Some(currency) = payload.currency {
        let currency = currency.trim().to_uppercase();
        if currency.len() != 3 {
            return Err(AppError::Validation("Currency must be a 3-letter code".into()));
        }
        settings.currency = currency;
    }
    if let Some(flag) = payload.maintenance_mode { settings.maintenance_mode = flag; }

    settings.updated_at = Utc::now();
    let saved = state.settings_repo.save(&settings).await?;
    info!("Site settings updated");
    Ok(ApiResponse::data(saved).with_message("Settings updated"))
}
