//! End-to-end tests of signup, login, token refresh and logout over the HTTP
//! surface, backed by the in-memory store.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{send, signup, test_app, test_app_with, test_config, PASSWORD, TEST_SECRET};
use listkeeper_server::auth::generate_access_token;
use listkeeper_server::config::Config;

#[tokio::test]
async fn test_signup_returns_tokens_and_sanitized_user() {
    let app = test_app();

    let res = send(
        &app,
        Method::POST,
        "/users",
        &[],
        Some(json!({ "email": "  Alice@Example.com ", "password": PASSWORD })),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.header("x-access-token").is_some());
    assert_eq!(res.header("x-refresh-token").map(|t| t.len()), Some(128));
    assert_eq!(res.body["email"], "alice@example.com");
    assert!(res.body.get("password").is_none());
    assert!(res.body.get("password_hash").is_none());
    assert!(res.body.get("sessions").is_none());
}

#[tokio::test]
async fn test_new_account_sees_empty_lists() {
    let app = test_app();
    let account = signup(&app, "a@x.com").await;

    let res = send(&app, Method::GET, "/lists", &account.access(), None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([]));
}

#[tokio::test]
async fn test_duplicate_signup_rejected() {
    let app = test_app();
    signup(&app, "dup@x.com").await;

    let res = send(
        &app,
        Method::POST,
        "/users",
        &[],
        Some(json!({ "email": "DUP@x.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_signup_bodies_rejected() {
    let app = test_app();

    let short_password = send(
        &app,
        Method::POST,
        "/users",
        &[],
        Some(json!({ "email": "a@x.com", "password": "short" })),
    )
    .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);

    let missing_field = send(
        &app,
        Method::POST,
        "/users",
        &[],
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = test_app();
    signup(&app, "bob@x.com").await;

    let wrong_password = send(
        &app,
        Method::POST,
        "/users/login",
        &[],
        Some(json!({ "email": "bob@x.com", "password": "wrong-password" })),
    )
    .await;
    let unknown_email = send(
        &app,
        Method::POST,
        "/users/login",
        &[],
        Some(json!({ "email": "nobody@x.com", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
}

#[tokio::test]
async fn test_login_opens_independent_session() {
    let app = test_app();
    let account = signup(&app, "carol@x.com").await;

    let res = send(
        &app,
        Method::POST,
        "/users/login",
        &[],
        Some(json!({ "email": "carol@x.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], account.id.as_str());
    let second_refresh = res.header("x-refresh-token").unwrap();
    assert_ne!(second_refresh, account.refresh_token);

    // Both sessions remain usable
    for token in [account.refresh_token.as_str(), second_refresh.as_str()] {
        let res = send(
            &app,
            Method::GET,
            "/users/me/access-token",
            &[("x-refresh-token", token), ("_id", account.id.as_str())],
            None,
        )
        .await;
        assert_eq!(res.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_refresh_issues_working_access_token() {
    let app = test_app();
    let account = signup(&app, "dave@x.com").await;

    let res = send(
        &app,
        Method::GET,
        "/users/me/access-token",
        &account.session(),
        None,
    )
    .await;

    assert_eq!(res.status, StatusCode::OK);
    let token = res.body["accessToken"].as_str().unwrap().to_string();
    assert_eq!(res.header("x-access-token"), Some(token.clone()));

    let lists = send(
        &app,
        Method::GET,
        "/lists",
        &[("x-access-token", token.as_str())],
        None,
    )
    .await;
    assert_eq!(lists.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_requires_matching_user() {
    let app = test_app();
    let alice = signup(&app, "alice@x.com").await;
    let bob = signup(&app, "bob@x.com").await;

    let res = send(
        &app,
        Method::GET,
        "/users/me/access-token",
        &[
            ("x-refresh-token", alice.refresh_token.as_str()),
            ("_id", bob.id.as_str()),
        ],
        None,
    )
    .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_only_that_session() {
    let app = test_app();
    let account = signup(&app, "erin@x.com").await;
    let other = send(
        &app,
        Method::POST,
        "/users/login",
        &[],
        Some(json!({ "email": "erin@x.com", "password": PASSWORD })),
    )
    .await
    .header("x-refresh-token")
    .unwrap();

    let res = send(
        &app,
        Method::DELETE,
        "/users/me/session",
        &account.session(),
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let revoked = send(
        &app,
        Method::GET,
        "/users/me/access-token",
        &account.session(),
        None,
    )
    .await;
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);

    let still_valid = send(
        &app,
        Method::GET,
        "/users/me/access-token",
        &[("x-refresh-token", other.as_str()), ("_id", account.id.as_str())],
        None,
    )
    .await;
    assert_eq!(still_valid.status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_or_bad_tokens_rejected() {
    let app = test_app();
    let account = signup(&app, "frank@x.com").await;

    let no_header = send(&app, Method::GET, "/lists", &[], None).await;
    assert_eq!(no_header.status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_header.body["code"], "UNAUTHORIZED");

    // Flip the first signature character
    let (signed, signature) = account.access_token.rsplit_once('.').unwrap();
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{}.{}{}", signed, flipped, &signature[1..]);
    let res = send(
        &app,
        Method::GET,
        "/lists",
        &[("x-access-token", tampered.as_str())],
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let user_id = Uuid::parse_str(&account.id).unwrap();
    let expired = generate_access_token(user_id, TEST_SECRET, -5).unwrap();
    let res = send(
        &app,
        Method::GET,
        "/lists",
        &[("x-access-token", expired.token.as_str())],
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let forged = generate_access_token(user_id, "some-other-secret", 900).unwrap();
    let res = send(
        &app,
        Method::GET,
        "/lists",
        &[("x-access-token", forged.token.as_str())],
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let no_id = send(
        &app,
        Method::GET,
        "/users/me/access-token",
        &[("x-refresh-token", account.refresh_token.as_str())],
        None,
    )
    .await;
    assert_eq!(no_id.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_account_ends_sessions() {
    let app = test_app();
    let account = signup(&app, "gina@x.com").await;

    let me = send(&app, Method::GET, "/users/me", &account.access(), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "gina@x.com");

    let res = send(&app, Method::DELETE, "/users/me", &account.access(), None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = send(
        &app,
        Method::GET,
        "/users/me/access-token",
        &account.session(),
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = send(&app, Method::GET, "/users/me", &account.access(), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let app = test_app();

    let res = send(&app, Method::GET, "/health", &[], None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.header("x-content-type-options").as_deref(), Some("nosniff"));
    assert!(res.header("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_expired_session_rejected() {
    let app = test_app_with(Config {
        refresh_token_ttl_days: -1,
        ..test_config()
    });
    let account = signup(&app, "old@x.com").await;

    let res = send(
        &app,
        Method::GET,
        "/users/me/access-token",
        &account.session(),
        None,
    )
    .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], "UNAUTHORIZED");

    let res = send(
        &app,
        Method::DELETE,
        "/users/me/session",
        &account.session(),
        None,
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cors_exposes_token_headers() {
    for origins in [None, Some("https://app.example.com")] {
        let app = test_app_with(Config {
            cors_allowed_origins: origins.map(str::to_string),
            ..test_config()
        });

        let res = send(
            &app,
            Method::POST,
            "/users",
            &[("origin", "https://app.example.com")],
            Some(json!({ "email": "cors@x.com", "password": PASSWORD })),
        )
        .await;

        assert_eq!(res.status, StatusCode::OK);
        let exposed = res
            .header("access-control-expose-headers")
            .unwrap()
            .to_lowercase();
        assert!(exposed.contains("x-access-token"), "{}", exposed);
        assert!(exposed.contains("x-refresh-token"), "{}", exposed);
    }
}
