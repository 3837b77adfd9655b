#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use imeiwatch_registry::config::{AppConfig, StoreBackend};
use imeiwatch_registry::services::login_throttle::Clock;
use imeiwatch_registry::store::{MemoryReportStore, ReportStore};
use imeiwatch_registry::{build_router, AppState};

pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const VALID_IMEI: &str = "490154203237518";
pub const OTHER_IMEI: &str = "356938035643809";

/// Clock that only moves when told to.
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryReportStore>,
    pub clock: Arc<ManualClock>,
}

/// Config with a plaintext admin password, a small throttle (3 attempts per
/// 60s) and static directories that do not exist.
pub fn test_config() -> AppConfig {
    AppConfig {
        store_backend: StoreBackend::Memory,
        session_secret: "integration-test-secret".into(),
        admin_password: ADMIN_PASSWORD.into(),
        login_max_attempts: 3,
        login_window_secs: 60,
        public_dir: "/nonexistent/imeiwatch/public".into(),
        admin_dir: "/nonexistent/imeiwatch/admin".into(),
        ..AppConfig::default()
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: AppConfig) -> TestApp {
    let store = Arc::new(MemoryReportStore::new());
    let clock = ManualClock::new();
    let state = Arc::new(AppState::new(
        config,
        store.clone() as Arc<dyn ReportStore>,
        clock.clone(),
    ));

    TestApp {
        router: build_router(state.clone()),
        state,
        store,
        clock,
    }
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_with_cookie(app: &TestApp, uri: &str, cookie: &str) -> Response {
    let request = Request::get(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn json_request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
}

pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response {
    let request = json_request(Method::POST, uri)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn patch_json(
    app: &TestApp,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> Response {
    let mut builder = json_request(Method::PATCH, uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Attempt an admin login from `origin`.
pub async fn login_from(app: &TestApp, origin: &str, password: &str) -> Response {
    let request = Request::post("/api/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", origin)
        .body(Body::from(serde_json::json!({ "password": password }).to_string()))
        .unwrap();
    send(app, request).await
}

/// The `sid=...` pair from a response's Set-Cookie header.
pub fn session_cookie(response: &Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response sets a cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

/// Log in successfully and return the cookie to replay.
pub async fn admin_cookie(app: &TestApp) -> String {
    let response = login_from(app, "192.0.2.10", ADMIN_PASSWORD).await;
    assert_eq!(response.status(), 200);
    session_cookie(&response)
}

/// Submit a report and return its `ref`.
pub async fn submit_report(app: &TestApp, imei: &str, status: &str, is_public: bool) -> String {
    let body = serde_json::json!({
        "imei": imei,
        "status": status,
        "brand": "Acme",
        "model": "Phone 3",
        "location": "Harbour market",
        "description": "blue case",
        "contact_name": "Robin",
        "contact_email": "robin@example.com",
        "contact_phone": "+15550100",
        "police_report": "PR-2026-17",
        "is_public": is_public,
    });
    let response = post_json(app, "/api/report", body).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"]["ref"]
        .as_str()
        .unwrap()
        .to_string()
}
