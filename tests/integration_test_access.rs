mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn test_role_gates() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let client = app.register_client("Cleo", "cleo@example.com").await;
    let agent = app.verified_agent("Alex", "alex@agency.com").await;

    let (status, _) = app.send("GET", "/api/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.send("GET", "/api/admin/stats", Some(&client), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    let (status, _) = app.send("GET", "/api/agent/stats", Some(&client), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send("GET", "/api/admin/agents", Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.send("GET", "/api/client/favorites", Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("GET", "/api/agent/stats", Some(&agent), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["total_properties"], 0);

    let (status, body) = app.send("GET", "/api/client/stats", Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["favorites"], 0);

    // Admin is allowed everywhere
    let (status, body) = app.send("GET", "/api/admin/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["total_clients"], 1);
    assert_eq!(body["stats"]["verified_agents"], 1);
    let (status, _) = app.send("GET", "/api/agent/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    // Shared account routes
    for auth in [&admin, &agent, &client] {
        let (status, _) = app.send("GET", "/api/notifications", Some(auth), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.send("GET", "/api/profile", Some(auth), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_access_check_endpoint() {
    let app = TestApp::new().await;
    let client = app.register_client("Cleo", "cleo@example.com").await;

    let (status, body) = app.send("GET", "/api/access/check?path=/dashboard/client/favorites", Some(&client), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["allowed"], true);

    let (_, body) = app.send("GET", "/api/access/check?path=/dashboard/agent", Some(&client), None).await;
    assert_eq!(body["data"]["allowed"], false);

    let (_, body) = app.send("GET", "/api/access/check?path=/dashboard/client", None, None).await;
    assert_eq!(body["data"]["allowed"], false);
}
