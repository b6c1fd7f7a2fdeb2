mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{TestApp, PASSWORD};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_client_registration_issues_tokens() {
    let app = TestApp::new().await;

    let client = app.register_client("Cleo Client", "Cleo@Example.com").await;
    let (status, body) = app.send("GET", "/api/auth/me", Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "cleo@example.com");
    assert_eq!(body["data"]["role"], "client");
    assert!(body["data"].get("password_hash").is_none());

    // Duplicate email, any casing
    let (status, body) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Other", "email": "CLEO@example.com", "password": PASSWORD
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_registration_validation() {
    let app = TestApp::new().await;

    let (status, _) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Short", "email": "short@example.com", "password": "1234"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Sneaky", "email": "sneaky@example.com", "password": PASSWORD, "role": "admin"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_agent_requires_approval() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/api/auth/register", None, Some(json!({
        "name": "Alex Agent", "email": "alex@agency.com", "password": PASSWORD, "role": "agent"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["agent_profile"]["is_verified"], false);
    assert!(body["data"].get("access_token").is_none());
    let agent_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.send("POST", "/api/auth/login", None, Some(json!({
        "email": "alex@agency.com", "password": PASSWORD
    }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin().await;
    let (status, body) = app.send("PUT", &format!("/api/admin/agents/{}/approve", agent_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["agent_profile"]["is_verified"], true);

    let notifications: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ?")
        .bind(&agent_id)
        .fetch_one(&app.pool).await.unwrap();
    assert_eq!(notifications, 1);

    // A second approval is refused and writes nothing
    let (status, _) = app.send("PUT", &format!("/api/admin/agents/{}/approve", agent_id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.count_rows("notifications").await, 1);

    let agent = app.login("alex@agency.com", PASSWORD).await;
    let (status, body) = app.send("GET", "/api/notifications", Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["type"], "agent_approved");
    assert_eq!(body["stats"]["unread"], 1);
}

#[tokio::test]
async fn test_rejected_agent_cannot_login() {
    let app = TestApp::new().await;
    let agent_id = app.register_agent("Rita", "rita@agency.com").await;
    let admin = app.admin().await;

    let (status, body) = app.send("PUT", &format!("/api/admin/agents/{}/reject", agent_id), Some(&admin), Some(json!({
        "reason": "License could not be verified"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (status, body) = app.send("POST", "/api/auth/login", None, Some(json!({
        "email": "rita@agency.com", "password": PASSWORD
    }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let (_, body) = app.send("GET", "/api/admin/agents?status=rejected", Some(&admin), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = app.send("GET", "/api/admin/agents?status=pending", Some(&admin), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_credentials() {
    let app = TestApp::new().await;
    app.register_client("Cleo", "cleo@example.com").await;

    let (status, _) = app.send("POST", "/api/auth/login", None, Some(json!({
        "email": "cleo@example.com", "password": "wrong-password"
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send("POST", "/api/auth/login", None, Some(json!({
        "email": "nobody@example.com", "password": PASSWORD
    }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_and_cookie_tokens() {
    let app = TestApp::new().await;
    let client = app.register_client("Cleo", "cleo@example.com").await;

    // Bearer tokens need no CSRF header, even for writes
    let response = app.router.clone().oneshot(
        Request::builder().method("PUT").uri("/api/profile")
            .header(header::AUTHORIZATION, format!("Bearer {}", client.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"phone": "555-0101"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Cookie tokens do
    let response = app.router.clone().oneshot(
        Request::builder().method("PUT").uri("/api/profile")
            .header(header::COOKIE, format!("access_token={}", client.access_token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"phone": "555-0102"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reads through a cookie are fine without it
    let response = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/profile")
            .header(header::COOKIE, format!("access_token={}", client.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = app.send("GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/auth/me")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotation_and_logout() {
    let app = TestApp::new().await;
    app.register_client("Cleo", "cleo@example.com").await;

    let response = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"email": "cleo@example.com", "password": PASSWORD}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let refresh_cookie = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .find(|c| c.starts_with("refresh_token="))
        .expect("No refresh_token cookie returned");
    let refresh_token = refresh_cookie["refresh_token=".len()..].split(';').next().unwrap().to_string();

    let refresh = |token: String| {
        let router = app.router.clone();
        async move {
            router.oneshot(
                Request::builder().method("POST").uri("/api/auth/refresh")
                    .header(header::COOKIE, format!("refresh_token={}", token))
                    .body(Body::empty()).unwrap()
            ).await.unwrap()
        }
    };

    let first = refresh(refresh_token.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    // The consumed token is gone
    let replay = refresh(refresh_token.clone()).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    let rotated = first.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .find(|c| c.starts_with("refresh_token="))
        .unwrap();
    let rotated = rotated["refresh_token=".len()..].split(';').next().unwrap().to_string();

    let response = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/auth/logout")
            .header(header::COOKIE, format!("refresh_token={}", rotated))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Logout revokes the whole rotation family
    let after_logout = refresh(rotated).await;
    assert_eq!(after_logout.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app.send("POST", "/api/auth/login", None, Some(json!({ "email": "a@b.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("password"));
}
