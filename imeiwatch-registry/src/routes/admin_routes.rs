use axum::extract::{Path, State};
use axum::Json;
use serde_json::{Map, Value};
use std::sync::Arc;

use imeiwatch_shared::errors::AppResult;
use imeiwatch_shared::middleware::JsonBody;
use imeiwatch_shared::types::api::{Ack, ApiResponse};
use imeiwatch_shared::types::auth::AdminSession;

use crate::models::Report;
use crate::services::report_service;
use crate::AppState;

// --- List recent reports (full records) ---

pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
) -> AppResult<Json<ApiResponse<Vec<Report>>>> {
    let reports = report_service::admin_list(state.store.as_ref(), state.config.admin_list_limit)?;
    Ok(Json(ApiResponse::ok(reports)))
}

// --- Update status / visibility ---

pub async fn update_report(
    State(state): State<Arc<AppState>>,
    _admin: AdminSession,
    Path(reference): Path<String>,
    JsonBody(body): JsonBody<Map<String, Value>>,
) -> AppResult<Json<ApiResponse<Ack>>> {
    report_service::admin_update(state.store.as_ref(), &reference, &body)?;
    Ok(Json(ApiResponse::ok(Ack::OK)))
}
