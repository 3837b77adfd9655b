use axum::routing::{get, patch, post};
use axum::{middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod config;
pub mod imei;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;

use crate::config::AppConfig;
use crate::services::auth_service::AdminCredential;
use crate::services::login_throttle::{Clock, LoginThrottle};
use crate::services::token_service::RevokedSessions;
use crate::store::ReportStore;
use imeiwatch_shared::types::auth::SessionAuthority;

pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ReportStore>,
    pub credential: AdminCredential,
    pub session_key: Vec<u8>,
    pub throttle: LoginThrottle,
    pub revoked: RevokedSessions,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ReportStore>, clock: Arc<dyn Clock>) -> Self {
        let throttle = LoginThrottle::new(
            config.login_max_attempts,
            Duration::from_secs(config.login_window_secs),
            clock,
        );
        Self {
            credential: AdminCredential::from_config(&config),
            session_key: config.session_key(),
            throttle,
            revoked: RevokedSessions::new(),
            metrics_handle: None,
            store,
            config,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

impl SessionAuthority for AppState {
    fn session_secret(&self) -> &[u8] {
        &self.session_key
    }

    fn is_revoked(&self, token_id: &Uuid) -> bool {
        self.revoked.contains(token_id)
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let admin_page = Path::new(&state.config.admin_dir).join("admin.html");
    let public_dir = ServeDir::new(&state.config.public_dir);

    let api = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/check", get(routes::public_routes::check_imei))
        .route("/report", post(routes::public_routes::create_report))
        .route("/auth/login", post(routes::auth_routes::login))
        .route("/auth/logout", post(routes::auth_routes::logout))
        .route("/auth/me", get(routes::auth_routes::me))
        .route("/reports", get(routes::admin_routes::list_reports))
        .route("/reports/:ref", patch(routes::admin_routes::update_report));

    Router::new()
        .nest("/api", api)
        .route("/metrics", get(routes::health::metrics))
        .route_service("/admin", ServeFile::new(admin_page))
        .fallback_service(public_dir)
        .layer(middleware::from_fn(imeiwatch_shared::middleware::metrics_middleware))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
