use axum::{
    body::Body,
    extract::Request,
    middleware,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::extractors::access::require_access;
use crate::api::handlers::{
    admin, assistant, auth, catalog, dashboard, favorite, health, inquiry, lead, notification,
    profile, property, saved_search, tour,
};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let guarded = Router::new()
        .merge(admin_routes())
        .merge(agent_routes())
        .merge(client_routes())
        .merge(account_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_access));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public_routes())
        .merge(guarded)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))

        // Catalogue
        .route("/api/properties", get(property::list_properties))
        .route("/api/properties/{id}", get(property::get_property))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/testimonials", get(catalog::list_approved_testimonials).post(catalog::submit_testimonial))
        .route("/api/settings", get(catalog::get_settings))

        // Lead capture
        .route("/api/contact", post(lead::submit_contact))
        .route("/api/leads", post(lead::create_lead))

        // Assistant
        .route("/api/chat", post(assistant::chat))
        .route("/api/mortgage", post(assistant::calculate_mortgage))
        .route("/api/access/check", get(assistant::check_access))
}

fn account_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(profile::get_profile).put(profile::update_profile))
        .route("/api/notifications", get(notification::list_notifications))
        .route("/api/notifications/read-all", put(notification::mark_all_read))
        .route("/api/notifications/{id}/read", put(notification::mark_read))
        .route("/api/notifications/{id}", delete(notification::delete_notification))
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/stats", get(admin::dashboard_stats))

        // Agents & clients
        .route("/api/admin/agents", get(admin::list_agents))
        .route("/api/admin/agents/{id}/approve", put(admin::approve_agent))
        .route("/api/admin/agents/{id}/reject", put(admin::reject_agent))
        .route("/api/admin/clients", get(admin::list_clients))
        .route("/api/admin/clients/{id}", delete(admin::delete_client))

        // Listings & activity
        .route("/api/admin/properties", get(property::list_all_properties))
        .route("/api/admin/properties/{id}", put(property::update_property).delete(property::delete_property))
        .route("/api/admin/inquiries", get(inquiry::list_all_inquiries))
        .route("/api/admin/inquiries/{id}", delete(inquiry::delete_inquiry))
        .route("/api/admin/tours", get(tour::list_all_tours))
        .route("/api/admin/tours/{id}", delete(tour::delete_tour))
        .route("/api/admin/leads", get(lead::list_leads))
        .route("/api/admin/leads/{id}", put(lead::update_lead).delete(lead::delete_lead))

        // Site content
        .route("/api/admin/categories", post(catalog::create_category))
        .route("/api/admin/categories/{id}", put(catalog::update_category).delete(catalog::delete_category))
        .route("/api/admin/testimonials", get(catalog::list_all_testimonials))
        .route("/api/admin/testimonials/{id}/approve", put(catalog::approve_testimonial))
        .route("/api/admin/testimonials/{id}", delete(catalog::delete_testimonial))
        .route("/api/admin/settings", get(catalog::get_settings).put(catalog::update_settings))
}

fn agent_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/agent/stats", get(dashboard::agent_stats))
        .route("/api/agent/properties", get(property::list_agent_properties).post(property::create_property))
        .route("/api/agent/properties/{id}", put(property::update_property))
        .route("/api/agent/inquiries", get(inquiry::list_agent_inquiries))
        .route("/api/agent/inquiries/{id}/reply", put(inquiry::reply_inquiry))
        .route("/api/agent/inquiries/{id}/close", put(inquiry::close_inquiry))
        .route("/api/agent/inquiries/{id}", delete(inquiry::delete_agent_inquiry))
        .route("/api/agent/tours", get(tour::list_agent_tours))
        .route("/api/agent/tours/{id}/status", put(tour::update_tour_status))
        .route("/api/agent/leads", get(lead::list_agent_leads))
}

fn client_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/client/stats", get(dashboard::client_stats))
        .route("/api/client/inquiries", get(inquiry::list_client_inquiries).post(inquiry::create_inquiry))
        .route("/api/client/tours", get(tour::list_client_tours).post(tour::book_tour))
        .route("/api/client/tours/{id}", delete(tour::cancel_tour))
        .route("/api/client/favorites", get(favorite::list_favorites))
        .route("/api/client/favorites/toggle", post(favorite::toggle_favorite))
        .route("/api/client/favorites/{property_id}", delete(favorite::remove_favorite))
        .route("/api/client/saved-searches", get(saved_search::list_saved_searches).post(saved_search::create_saved_search))
        .route("/api/client/saved-searches/{id}", delete(saved_search::delete_saved_search))
}
