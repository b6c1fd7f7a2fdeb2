mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_inquiry_lifecycle() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;
    let other_agent = app.verified_agent("Bea", "bea@agency.com").await;
    let client = app.register_client("Cleo", "cleo@example.com").await;
    let property_id = app.create_property(&agent, "Loft", "Austin", 250_000.0).await;

    let (status, body) = app.send("POST", "/api/client/inquiries", Some(&client), Some(json!({
        "property_id": property_id, "message": "Is parking included?"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["property_id"], property_id.as_str());
    assert_eq!(body["data"]["agent_id"], agent.user_id.as_str());
    let inquiry_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = app.send("GET", "/api/notifications", Some(&agent), None).await;
    assert!(body["data"].as_array().unwrap().iter().any(|n| n["type"] == "inquiry_received"));

    let (_, body) = app.send("GET", "/api/agent/inquiries", Some(&agent), None).await;
    assert_eq!(body["data"][0]["property_title"], "Loft");
    assert_eq!(body["data"][0]["client_name"], "Cleo");

    let (_, body) = app.send("GET", "/api/agent/inquiries", Some(&other_agent), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = app.send("PUT", &format!("/api/agent/inquiries/{}/reply", inquiry_id), Some(&other_agent), Some(json!({
        "response": "Not mine"
    }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.send("DELETE", &format!("/api/agent/inquiries/{}", inquiry_id), Some(&other_agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("PUT", &format!("/api/agent/inquiries/{}/reply", inquiry_id), Some(&agent), Some(json!({
        "response": "Yes, one spot."
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "replied");
    assert_eq!(body["data"]["agent_response"], "Yes, one spot.");

    let (_, body) = app.send("GET", "/api/notifications?unread_only=true", Some(&client), None).await;
    assert_eq!(body["data"][0]["type"], "inquiry_replied");

    let (status, body) = app.send("PUT", &format!("/api/agent/inquiries/{}/close", inquiry_id), Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "closed");

    // Closed is terminal
    let (status, _) = app.send("PUT", &format!("/api/agent/inquiries/{}/reply", inquiry_id), Some(&agent), Some(json!({
        "response": "Again"
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.send("GET", "/api/client/inquiries?status=closed", Some(&client), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_inquiry_for_missing_property() {
    let app = TestApp::new().await;
    let client = app.register_client("Cleo", "cleo@example.com").await;

    let (status, _) = app.send("POST", "/api/client/inquiries", Some(&client), Some(json!({
        "property_id": "missing", "message": "Hello?"
    }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.count_rows("inquiries").await, 0);
}

#[tokio::test]
async fn test_tour_booking_and_status() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;
    let other_agent = app.verified_agent("Bea", "bea@agency.com").await;
    let client = app.register_client("Cleo", "cleo@example.com").await;
    let second_client = app.register_client("Dan", "dan@example.com").await;
    let property_id = app.create_property(&agent, "Loft", "Austin", 250_000.0).await;
    let date = (Utc::now() + Duration::days(3)).date_naive().to_string();

    let (status, body) = app.send("POST", "/api/client/tours", Some(&client), Some(json!({
        "property_id": property_id, "scheduled_date": date, "scheduled_time": "9:30"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "scheduled");
    assert_eq!(body["data"]["scheduled_time"], "09:30");
    let tour_id = body["data"]["id"].as_str().unwrap().to_string();

    // Same agent slot is taken
    let (status, _) = app.send("POST", "/api/client/tours", Some(&second_client), Some(json!({
        "property_id": property_id, "scheduled_date": date, "scheduled_time": "09:30"
    }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let past = (Utc::now() - Duration::days(1)).date_naive().to_string();
    let (status, _) = app.send("POST", "/api/client/tours", Some(&client), Some(json!({
        "property_id": property_id, "scheduled_date": past, "scheduled_time": "10:00"
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("PUT", &format!("/api/agent/tours/{}/status", tour_id), Some(&other_agent), Some(json!({
        "status": "completed"
    }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("PUT", &format!("/api/agent/tours/{}/status", tour_id), Some(&agent), Some(json!({
        "status": "completed", "notes": "Went well"
    }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");

    let (_, body) = app.send("GET", "/api/notifications", Some(&client), None).await;
    assert!(body["data"].as_array().unwrap().iter().any(|n| n["type"] == "tour_updated"));

    // Completed tours cannot be cancelled
    let (status, _) = app.send("DELETE", &format!("/api/client/tours/{}", tour_id), Some(&client), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.send("GET", "/api/agent/tours", Some(&agent), None).await;
    assert_eq!(body["data"][0]["property_title"], "Loft");
    assert_eq!(body["data"][0]["client_email"], "cleo@example.com");
}

#[tokio::test]
async fn test_client_cancels_tour() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;
    let client = app.register_client("Cleo", "cleo@example.com").await;
    let intruder = app.register_client("Eve", "eve@example.com").await;
    let property_id = app.create_property(&agent, "Loft", "Austin", 250_000.0).await;
    let date = (Utc::now() + Duration::days(2)).date_naive().to_string();

    let (_, body) = app.send("POST", "/api/client/tours", Some(&client), Some(json!({
        "property_id": property_id, "scheduled_date": date, "scheduled_time": "14:00"
    }))).await;
    let tour_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.send("DELETE", &format!("/api/client/tours/{}", tour_id), Some(&intruder), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("DELETE", &format!("/api/client/tours/{}", tour_id), Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    let (_, body) = app.send("GET", "/api/notifications", Some(&agent), None).await;
    let kinds: Vec<&str> = body["data"].as_array().unwrap().iter().filter_map(|n| n["type"].as_str()).collect();
    assert!(kinds.contains(&"tour_booked"));
    assert!(kinds.contains(&"tour_cancelled"));

    // The slot is free again
    let (status, _) = app.send("POST", "/api/client/tours", Some(&intruder), Some(json!({
        "property_id": property_id, "scheduled_date": date, "scheduled_time": "14:00"
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_favorite_toggle_is_reversible() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;
    let client = app.register_client("Cleo", "cleo@example.com").await;
    let property_id = app.create_property(&agent, "Loft", "Austin", 250_000.0).await;

    let (status, body) = app.send("POST", "/api/client/favorites/toggle", Some(&client), Some(json!({"property_id": property_id}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["favorited"], true);

    let (_, body) = app.send("GET", "/api/client/favorites", Some(&client), None).await;
    assert_eq!(body["data"][0]["title"], "Loft");
    assert!(body["data"][0]["favorite_id"].is_string());

    let (_, body) = app.send("POST", "/api/client/favorites/toggle", Some(&client), Some(json!({"property_id": property_id}))).await;
    assert_eq!(body["data"]["favorited"], false);
    assert_eq!(app.count_rows("favorites").await, 0);

    app.send("POST", "/api/client/favorites/toggle", Some(&client), Some(json!({"property_id": property_id}))).await;
    let (status, _) = app.send("DELETE", &format!("/api/client/favorites/{}", property_id), Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send("DELETE", &format!("/api/client/favorites/{}", property_id), Some(&client), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("POST", "/api/client/favorites/toggle", Some(&client), Some(json!({"property_id": "missing"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_saved_searches() {
    let app = TestApp::new().await;
    let client = app.register_client("Cleo", "cleo@example.com").await;
    let other = app.register_client("Dan", "dan@example.com").await;

    let (status, body) = app.send("POST", "/api/client/saved-searches", Some(&client), Some(json!({
        "name": "Austin family homes",
        "criteria": { "city": "Austin", "min_bedrooms": 3, "max_price": 500000.0 }
    }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["criteria"]["city"], "Austin");
    assert_eq!(body["data"]["alerts_enabled"], true);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app.send("POST", "/api/client/saved-searches", Some(&client), Some(json!({
        "name": "Bad", "criteria": { "min_price": 10.0, "max_price": 5.0 }
    }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.send("DELETE", &format!("/api/client/saved-searches/{}", id), Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.send("GET", "/api/client/stats", Some(&client), None).await;
    assert_eq!(body["stats"]["saved_searches"], 1);

    let (status, _) = app.send("DELETE", &format!("/api/client/saved-searches/{}", id), Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.send("GET", "/api/client/saved-searches", Some(&client), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_notification_management() {
    let app = TestApp::new().await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;
    let client = app.register_client("Cleo", "cleo@example.com").await;
    let property_id = app.create_property(&agent, "Loft", "Austin", 250_000.0).await;

    for msg in ["First", "Second"] {
        app.send("POST", "/api/client/inquiries", Some(&client), Some(json!({
            "property_id": property_id, "message": msg
        }))).await;
    }

    let (_, body) = app.send("GET", "/api/notifications", Some(&agent), None).await;
    // agent_approved + two inquiries
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    let first_id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = app.send("PUT", &format!("/api/notifications/{}/read", first_id), Some(&client), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.send("PUT", &format!("/api/notifications/{}/read", first_id), Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_read"], true);

    let (_, body) = app.send("PUT", "/api/notifications/read-all", Some(&agent), None).await;
    assert_eq!(body["data"]["updated"], 2);

    let (status, _) = app.send("DELETE", &format!("/api/notifications/{}", first_id), Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.send("GET", "/api/notifications", Some(&agent), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["stats"]["unread"], 0);
}
