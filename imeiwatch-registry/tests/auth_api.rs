//! HTTP-level tests for admin login, the per-origin login throttle and `/me`.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_test_app, build_test_app_with, get, get_with_cookie, login_from, send,
    session_cookie, test_config, ADMIN_PASSWORD,
};
use imeiwatch_registry::config::AppConfig;
use imeiwatch_registry::services::auth_service::hash_password;

const ATTACKER: &str = "203.0.113.50";
const BYSTANDER: &str = "198.51.100.7";

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_sets_http_only_session_cookie() {
    let app = build_test_app();
    let response = login_from(&app, BYSTANDER, ADMIN_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("sid="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=28800"));
    assert_eq!(body_json(response).await["data"]["ok"], true);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = build_test_app();
    let response = login_from(&app, BYSTANDER, "not-the-password").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(body_json(response).await["error"]["code"], "E2001");
    assert_eq!(app.state.throttle.failures(BYSTANDER), 1);
}

#[tokio::test]
async fn missing_password_is_a_validation_error() {
    let app = build_test_app();
    for body in ["{}", "{\"password\": \"\"}"] {
        let request = Request::post("/api/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", BYSTANDER)
            .body(Body::from(body))
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "E2002");
    }
    assert_eq!(app.state.throttle.failures(BYSTANDER), 0);
}

#[tokio::test]
async fn unconfigured_admin_cannot_log_in() {
    let config = AppConfig {
        admin_password: String::new(),
        ..test_config()
    };
    let app = build_test_app_with(config);
    let response = login_from(&app, BYSTANDER, "anything").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"]["code"], "E2003");
}

#[tokio::test]
async fn argon2_hashed_password_logs_in() {
    let config = AppConfig {
        admin_password: String::new(),
        admin_password_hash: hash_password("hashed-secret").unwrap(),
        ..test_config()
    };
    let app = build_test_app_with(config);

    assert_eq!(
        login_from(&app, BYSTANDER, "hashed-secret").await.status(),
        StatusCode::OK
    );
    assert_eq!(
        login_from(&app, BYSTANDER, ADMIN_PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn throttled_origin_is_refused_even_with_correct_password() {
    let app = build_test_app();

    for _ in 0..3 {
        let response = login_from(&app, ATTACKER, "guess").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = login_from(&app, ATTACKER, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(body_json(response).await["error"]["code"], "E0006");

    // Still refused right at the window edge.
    app.clock.advance(Duration::from_secs(60));
    assert_eq!(
        login_from(&app, ATTACKER, ADMIN_PASSWORD).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn throttle_is_per_origin() {
    let app = build_test_app();
    for _ in 0..3 {
        login_from(&app, ATTACKER, "guess").await;
    }

    assert_eq!(
        login_from(&app, BYSTANDER, ADMIN_PASSWORD).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn throttle_lifts_after_the_window() {
    let app = build_test_app();
    for _ in 0..3 {
        login_from(&app, ATTACKER, "guess").await;
    }
    assert_eq!(
        login_from(&app, ATTACKER, ADMIN_PASSWORD).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );

    app.clock.advance(Duration::from_secs(61));

    assert_eq!(
        login_from(&app, ATTACKER, ADMIN_PASSWORD).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn successful_login_does_not_reset_failures() {
    let app = build_test_app();
    for _ in 0..2 {
        login_from(&app, ATTACKER, "guess").await;
    }
    assert_eq!(login_from(&app, ATTACKER, ADMIN_PASSWORD).await.status(), StatusCode::OK);
    assert_eq!(app.state.throttle.failures(ATTACKER), 2);

    login_from(&app, ATTACKER, "guess").await;
    assert_eq!(
        login_from(&app, ATTACKER, ADMIN_PASSWORD).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

// ---------------------------------------------------------------------------
// Me
// ---------------------------------------------------------------------------

#[tokio::test]
async fn me_reflects_session_state() {
    let app = build_test_app();

    let anonymous = body_json(get(&app, "/api/auth/me").await).await;
    assert_eq!(anonymous["data"]["is_admin"], false);

    let cookie = session_cookie(&login_from(&app, BYSTANDER, ADMIN_PASSWORD).await);
    let admin = body_json(get_with_cookie(&app, "/api/auth/me", &cookie).await).await;
    assert_eq!(admin["data"]["is_admin"], true);
}
