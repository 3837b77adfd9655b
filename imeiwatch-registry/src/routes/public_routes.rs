use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use imeiwatch_shared::errors::AppResult;
use imeiwatch_shared::middleware::{JsonBody, QueryParams};
use imeiwatch_shared::types::api::ApiResponse;

use crate::models::{PublicReport, ReportSubmission};
use crate::services::report_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckParams {
    #[serde(default)]
    pub imei: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub imei: String,
    pub count: usize,
    pub reports: Vec<PublicReport>,
}

#[derive(Debug, Serialize)]
pub struct CreatedReport {
    #[serde(rename = "ref")]
    pub reference: Uuid,
}

// --- Public IMEI check ---

pub async fn check_imei(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<CheckParams>,
) -> AppResult<Json<ApiResponse<CheckResponse>>> {
    let (imei, reports) = report_service::public_lookup(state.store.as_ref(), &params.imei)?;

    Ok(Json(ApiResponse::ok(CheckResponse {
        imei,
        count: reports.len(),
        reports,
    })))
}

// --- Submit report ---

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<ReportSubmission>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedReport>>)> {
    let report = report_service::submit(state.store.as_ref(), body)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CreatedReport {
            reference: report.reference,
        })),
    ))
}
