use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use imeiwatch_shared::errors::{AppError, AppResult, ErrorCode};
use imeiwatch_shared::middleware::{JsonBody, OptionalAdminSession};
use imeiwatch_shared::types::api::{Ack, ApiResponse};

use crate::routes::origin::ClientOrigin;
use crate::services::token_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub is_admin: bool,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ClientOrigin(origin): ClientOrigin,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    if let Err(throttled) = state.throttle.check(&origin) {
        counter!("admin_login_throttled_total").increment(1);
        tracing::warn!(
            origin = %origin,
            retry_after_secs = throttled.retry_after.as_secs(),
            "admin login throttled"
        );
        return Err(AppError::new(ErrorCode::RateLimited, "too many attempts, try later"));
    }

    let password = req
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::PasswordRequired, "password required"))?;

    if !state.credential.verify(&password)? {
        state.throttle.record_failure(&origin);
        counter!("admin_login_failures_total").increment(1);
        tracing::warn!(
            origin = %origin,
            failures = state.throttle.failures(&origin),
            "admin login failed"
        );
        return Err(AppError::new(ErrorCode::InvalidCredentials, "invalid credentials"));
    }

    let ttl = state.config.session_ttl_secs;
    let session = token_service::create_admin_session(&state.session_key, ttl)?;
    let cookie = token_service::session_cookie(&session.token, ttl, state.config.production);

    tracing::info!(origin = %origin, session_id = %session.claims.jti, "admin logged in");

    Ok(([(SET_COOKIE, cookie)], Json(ApiResponse::ok(Ack::OK))))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    OptionalAdminSession(session): OptionalAdminSession,
) -> impl IntoResponse {
    if let Some(session) = session {
        state.revoked.revoke(session.token_id, session.expires_at);
        tracing::info!(session_id = %session.token_id, "admin logged out");
    }

    let cookie = token_service::cleared_session_cookie(state.config.production);
    ([(SET_COOKIE, cookie)], Json(ApiResponse::ok(Ack::OK)))
}

pub async fn me(
    OptionalAdminSession(session): OptionalAdminSession,
) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::ok(MeResponse {
        is_admin: session.is_some(),
    }))
}
