//! Integration tests for admission control on the HTTP surface.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;

use helpers::TestApp;

async fn renew_from(app: &TestApp, client: &str) -> helpers::TestResponse {
    app.request(
        "POST",
        "/api/auth/renew",
        None,
        &[("x-forwarded-for", client)],
    )
    .await
}

#[tokio::test]
async fn test_auth_class_burst_and_refill() {
    let app = TestApp::new();
    let client = "203.0.113.10";

    let first = renew_from(&app, client).await;
    assert_eq!(first.status, StatusCode::UNAUTHORIZED);
    assert_eq!(first.header("x-ratelimit-limit").as_deref(), Some("20"));
    assert_eq!(first.header("x-ratelimit-remaining").as_deref(), Some("19"));

    for _ in 1..20 {
        let response = renew_from(&app, client).await;
        assert_ne!(response.status, StatusCode::TOO_MANY_REQUESTS);
    }

    let throttled = renew_from(&app, client).await;
    assert_eq!(throttled.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(throttled.error_kind(), Some("RATE_LIMITED"));
    assert_eq!(throttled.header("retry-after").as_deref(), Some("1"));
    assert_eq!(throttled.header("x-ratelimit-limit").as_deref(), Some("20"));
    assert_eq!(throttled.header("x-ratelimit-remaining").as_deref(), Some("0"));
    assert_eq!(app.audit.count("RATE_LIMIT_EXCEEDED"), 1);

    app.clock.advance(Duration::seconds(1));
    for _ in 0..5 {
        let response = renew_from(&app, client).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
    let throttled = renew_from(&app, client).await;
    assert_eq!(throttled.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_clients_are_limited_independently() {
    let app = TestApp::new();
    for _ in 0..21 {
        renew_from(&app, "198.51.100.1").await;
    }
    assert_eq!(
        renew_from(&app, "198.51.100.1").await.status,
        StatusCode::TOO_MANY_REQUESTS
    );

    let other = renew_from(&app, "198.51.100.2").await;
    assert_eq!(other.status, StatusCode::UNAUTHORIZED);

    // Only the first forwarded entry identifies the client.
    let chained = app
        .request(
            "POST",
            "/api/auth/renew",
            None,
            &[("x-forwarded-for", "198.51.100.1, 10.0.0.7")],
        )
        .await;
    assert_eq!(chained.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_session_routes_use_reservation_class() {
    let app = TestApp::new();
    let response = app
        .request(
            "GET",
            "/api/auth/me",
            None,
            &[("x-real-ip", "192.0.2.44")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("x-ratelimit-limit").as_deref(), Some("100"));
}

#[tokio::test]
async fn test_health_is_not_limited() {
    let app = TestApp::new();
    for _ in 0..30 {
        let response = app
            .request("GET", "/api/health", None, &[("x-forwarded-for", "192.0.2.1")])
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.header("x-ratelimit-limit").is_none());
    }
}
