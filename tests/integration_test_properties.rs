mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_search_filters_and_pagination() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;

    for i in 0..5 {
        app.create_property(&agent, &format!("Austin Home {}", i), "Austin", 100_000.0 * (i + 1) as f64).await;
    }
    app.create_property(&agent, "Denver Cabin", "Denver", 450_000.0).await;

    let (status, body) = app.send("GET", "/api/properties?city=Austin&limit=2&page=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"], json!({"page": 2, "limit": 2, "total": 5, "pages": 3}));

    let (_, body) = app.send("GET", "/api/properties?min_price=250000&max_price=450000&sort=price_asc", None, None).await;
    let prices: Vec<f64> = body["data"].as_array().unwrap().iter().map(|p| p["price"].as_f64().unwrap()).collect();
    assert_eq!(prices, vec![300_000.0, 400_000.0, 450_000.0]);

    let (_, body) = app.send("GET", "/api/properties?keyword=cabin", None, None).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["city"], "Denver");

    let (_, body) = app.send("GET", "/api/properties?limit=500", None, None).await;
    assert_eq!(body["pagination"]["limit"], 50);
}

#[tokio::test]
async fn test_detail_counts_views_and_shows_agent() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;
    let id = app.create_property(&agent, "Loft", "Austin", 250_000.0).await;

    app.send("GET", &format!("/api/properties/{}", id), None, None).await;
    let (status, body) = app.send("GET", &format!("/api/properties/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["views"], 2);
    assert_eq!(body["data"]["agent"]["email"], "alex@agency.com");

    let (status, _) = app.send("GET", "/api/properties/does-not-exist", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_ownership() {
    let app = TestApp::new().await;
    let alex = app.verified_agent("Alex", "alex@agency.com").await;
    let bea = app.verified_agent("Bea", "bea@agency.com").await;
    let id = app.create_property(&alex, "Loft", "Austin", 250_000.0).await;

    let (status, _) = app.send("PUT", &format!("/api/agent/properties/{}", id), Some(&bea), Some(json!({"price": 1.0}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("PUT", &format!("/api/agent/properties/{}", id), Some(&alex), Some(json!({
        "price": 260000.0, "status": "Pending", "is_featured": true
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 260000.0);
    assert_eq!(body["data"]["is_featured"], false);

    let (status, _) = app.send("PUT", &format!("/api/agent/properties/{}", id), Some(&alex), Some(json!({"status": "Gone"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.send("GET", "/api/agent/properties", Some(&bea), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let admin = app.admin().await;
    let (status, body) = app.send("PUT", &format!("/api/admin/properties/{}", id), Some(&admin), Some(json!({"is_featured": true}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_featured"], true);

    let (status, _) = app.send("DELETE", &format!("/api/admin/properties/{}", id), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.count_rows("properties").await, 0);
}

#[tokio::test]
async fn test_create_property_validation() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;

    let (status, _) = app.send("POST", "/api/agent/properties", Some(&agent), Some(json!({
        "title": "Castle", "description": "Old", "price": 1000000.0, "property_type": "Castle",
        "address": "1 Hill", "city": "Edinburgh"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("POST", "/api/agent/properties", Some(&agent), Some(json!({
        "title": "Free house", "description": "", "price": 0.0, "property_type": "House",
        "address": "1 Hill", "city": "Austin"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_range_page_returns_empty_page() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;
    app.create_property(&agent, "Loft", "Austin", 250_000.0).await;

    let (status, body) = app.send("GET", &format!("/api/properties?page={}", i64::MAX), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 1);

    let (status, _) = app.send("GET", &format!("/api/admin/properties?page={}&limit=50", i64::MAX), Some(&app.admin().await), None).await;
    assert_eq!(status, StatusCode::OK);
}
