//! Integration tests for the register, login, renew, logout flow.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;

use helpers::{STRONG_PASSWORD, TestApp, cookie_header};

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new();

    let registered = app.register("A@Example.com", STRONG_PASSWORD).await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.body["created"], true);
    assert_eq!(registered.body["email"], "a@example.com");
    assert_eq!(registered.body["message"], "User created successfully");
    assert!(registered.body.get("password_hash").is_none());

    let login = app.login("a@example.com", STRONG_PASSWORD).await;
    assert_eq!(login.status, StatusCode::OK);
    let user_id = login.body["user"]["id"].as_u64().unwrap();
    assert_eq!(Some(user_id), registered.body["id"].as_u64());
    assert_eq!(login.body["user"]["is_admin"], false);
    assert!(login.body.get("refresh_token").is_none());

    let access = login.body["access_token"].as_str().unwrap().to_string();
    assert_eq!(login.cookie("access_token").as_deref(), Some(access.as_str()));
    assert!(login.cookie("refresh_token").is_some());

    let refresh_line = login.set_cookie("refresh_token").unwrap();
    assert!(refresh_line.contains("HttpOnly"));
    assert!(refresh_line.contains("SameSite=Strict"));
    assert!(refresh_line.contains("Max-Age=86400"));
    let access_line = login.set_cookie("access_token").unwrap();
    assert!(access_line.contains("Max-Age=900"));

    let bearer = format!("Bearer {access}");
    let me = app
        .request("GET", "/api/auth/me", None, &[("authorization", bearer.as_str())])
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"].as_u64(), Some(user_id));
    assert_eq!(me.body["is_admin"], false);

    let cookie = cookie_header("access_token", &access);
    let me = app
        .request("GET", "/api/auth/me", None, &[("cookie", cookie.as_str())])
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"].as_u64(), Some(user_id));

    assert_eq!(app.audit.count("REGISTRATION"), 1);
    assert_eq!(app.audit.count("LOGIN_SUCCESS"), 1);
}

#[tokio::test]
async fn test_register_existing_email_is_not_an_error() {
    let app = TestApp::new();
    let first = app.register("dup@example.com", STRONG_PASSWORD).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.register("DUP@example.com", STRONG_PASSWORD).await;
    assert_eq!(second.status, StatusCode::CREATED);
    assert_eq!(second.body["created"], false);
    assert_eq!(second.body["message"], "User already exists");
    assert_eq!(second.body["id"], first.body["id"]);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new();

    let bad_email = app.register("not-an-email", STRONG_PASSWORD).await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error_kind(), Some("INVALID_EMAIL"));

    let weak = app.register("weak@example.com", "password").await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
    assert_eq!(weak.error_kind(), Some("WEAK_PASSWORD"));

    let missing = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({ "email": "x@example.com" })),
            &[],
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error_kind(), Some("INVALID_INPUT"));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("known@example.com", STRONG_PASSWORD).await;

    let wrong_password = app.login("known@example.com", "Wr0ng!Passw0rd999").await;
    let unknown = app.login("unknown@example.com", STRONG_PASSWORD).await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown.body);
    assert_eq!(wrong_password.error_kind(), Some("INVALID_CREDENTIALS"));
    assert!(wrong_password.set_cookies().is_empty());
    assert_eq!(app.audit.count("LOGIN_FAILURE"), 2);
}

#[tokio::test]
async fn test_protect_gate_rejections() {
    let app = TestApp::new();

    let missing = app.request("GET", "/api/auth/me", None, &[]).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error_kind(), Some("MISSING_CREDENTIAL"));

    let garbage = app
        .request(
            "GET",
            "/api/auth/me",
            None,
            &[("authorization", "Bearer not.a.token")],
        )
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.error_kind(), Some("INVALID_CREDENTIAL"));

    let login = app.signed_in("gate@example.com").await;
    let refresh = login.cookie("refresh_token").unwrap();
    let bearer = format!("Bearer {refresh}");
    let wrong_kind = app
        .request("GET", "/api/auth/me", None, &[("authorization", bearer.as_str())])
        .await;
    assert_eq!(wrong_kind.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_kind.error_kind(), Some("INVALID_CREDENTIAL"));
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let app = TestApp::new();
    let login = app.signed_in("expiry@example.com").await;
    let bearer = format!("Bearer {}", login.body["access_token"].as_str().unwrap());

    app.clock.advance(Duration::minutes(16));

    let me = app
        .request("GET", "/api/auth/me", None, &[("authorization", bearer.as_str())])
        .await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.error_kind(), Some("INVALID_CREDENTIAL"));
}

#[tokio::test]
async fn test_renew_rotates_and_detects_replay() {
    let app = TestApp::new();
    let login = app.signed_in("rotate@example.com").await;
    let first = login.cookie("refresh_token").unwrap();

    let renewed = app
        .request(
            "POST",
            "/api/auth/renew",
            None,
            &[("cookie", cookie_header("refresh_token", &first).as_str())],
        )
        .await;
    assert_eq!(renewed.status, StatusCode::OK);
    assert!(renewed.body["access_token"].is_string());
    assert!(renewed.body["expires_at"].is_string());
    let second = renewed.cookie("refresh_token").unwrap();
    assert_ne!(first, second);
    assert_eq!(
        renewed.cookie("access_token").as_deref(),
        renewed.body["access_token"].as_str()
    );

    let renewed_again = app
        .request(
            "POST",
            "/api/auth/renew",
            None,
            &[("cookie", cookie_header("refresh_token", &second).as_str())],
        )
        .await;
    assert_eq!(renewed_again.status, StatusCode::OK);
    let third = renewed_again.cookie("refresh_token").unwrap();

    let replay = app
        .request(
            "POST",
            "/api/auth/renew",
            None,
            &[("cookie", cookie_header("refresh_token", &first).as_str())],
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.error_kind(), Some("SESSION_COMPROMISED"));
    assert!(replay.set_cookie("refresh_token").unwrap().contains("Max-Age=0"));
    assert_eq!(app.audit.count("SUSPICIOUS_ACTIVITY"), 1);

    // The replay revoked the live session too.
    let after = app
        .request(
            "POST",
            "/api/auth/renew",
            None,
            &[("cookie", cookie_header("refresh_token", &third).as_str())],
        )
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after.error_kind(), Some("SESSION_COMPROMISED"));
}

#[tokio::test]
async fn test_renew_without_refresh_cookie() {
    let app = TestApp::new();
    let response = app.request("POST", "/api/auth/renew", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_kind(), Some("MISSING_CREDENTIAL"));
}

#[tokio::test]
async fn test_logout_revokes_refresh_but_not_access() {
    let app = TestApp::new();
    let login = app.signed_in("logout@example.com").await;
    let access = login.body["access_token"].as_str().unwrap().to_string();
    let refresh = login.cookie("refresh_token").unwrap();
    let bearer = format!("Bearer {access}");

    let logout = app
        .request("POST", "/api/auth/logout", None, &[("authorization", bearer.as_str())])
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(logout.body["message"], "Logged out successfully");
    for name in ["access_token", "refresh_token"] {
        let line = logout.set_cookie(name).unwrap();
        assert!(line.contains("Max-Age=0"));
        assert!(line.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }
    assert_eq!(app.audit.count("LOGOUT"), 1);

    // Access credentials are stateless and live until they expire.
    let me = app
        .request("GET", "/api/auth/me", None, &[("authorization", bearer.as_str())])
        .await;
    assert_eq!(me.status, StatusCode::OK);

    let renew = app
        .request(
            "POST",
            "/api/auth/renew",
            None,
            &[("cookie", cookie_header("refresh_token", &refresh).as_str())],
        )
        .await;
    assert_eq!(renew.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_requires_session() {
    let app = TestApp::new();
    let response = app.request("POST", "/api/auth/logout", None, &[]).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_kind(), Some("MISSING_CREDENTIAL"));
}

#[tokio::test]
async fn test_admin_session_revocation() {
    let app = TestApp::new();
    let user_login = app.signed_in("viewer@example.com").await;
    let user_id = user_login.body["user"]["id"].as_u64().unwrap();
    let user_bearer = format!("Bearer {}", user_login.body["access_token"].as_str().unwrap());
    let user_refresh = user_login.cookie("refresh_token").unwrap();

    let path = format!("/api/admin/sessions/{user_id}");
    let denied = app
        .request("DELETE", &path, None, &[("authorization", user_bearer.as_str())])
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.error_kind(), Some("FORBIDDEN"));
    assert_eq!(app.audit.count("UNAUTHORIZED_ACCESS"), 1);

    app.create_admin("root@example.com").await;
    let admin_login = app.login("root@example.com", STRONG_PASSWORD).await;
    assert_eq!(admin_login.status, StatusCode::OK);
    assert_eq!(admin_login.body["user"]["is_admin"], true);
    let admin_bearer = format!("Bearer {}", admin_login.body["access_token"].as_str().unwrap());

    let revoked = app
        .request("DELETE", &path, None, &[("authorization", admin_bearer.as_str())])
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert_eq!(revoked.body["revoked"], true);
    assert_eq!(app.audit.count("SESSION_REVOKED"), 1);

    let renew = app
        .request(
            "POST",
            "/api/auth/renew",
            None,
            &[("cookie", cookie_header("refresh_token", &user_refresh).as_str())],
        )
        .await;
    assert_eq!(renew.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_security_headers() {
    let app = TestApp::new();

    let health = app.request("GET", "/api/health", None, &[]).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
    assert_eq!(health.header("x-content-type-options").as_deref(), Some("nosniff"));
    assert_eq!(health.header("x-frame-options").as_deref(), Some("DENY"));
    assert!(health.header("content-security-policy").is_some());
    assert!(health.header("strict-transport-security").is_none());
    assert!(health.header("cache-control").is_none());

    let login = app.login("nobody@example.com", STRONG_PASSWORD).await;
    assert_eq!(login.header("cache-control").as_deref(), Some("no-store"));
}

#[tokio::test]
async fn test_secure_cookies_and_hsts() {
    let mut config = helpers::test_config();
    config.auth.secure_cookies = true;
    let app = TestApp::with_config(config);

    let login = app.signed_in("secure@example.com").await;
    assert!(login.set_cookie("access_token").unwrap().ends_with("; Secure"));
    assert!(login.header("strict-transport-security").is_some());
}
