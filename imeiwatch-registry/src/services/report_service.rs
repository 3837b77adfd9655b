//! Report operations. Every domain check runs before the store is touched.

use chrono::Utc;
use metrics::counter;
use serde_json::{Map, Value};
use uuid::Uuid;

use imeiwatch_shared::errors::{AppError, AppResult, ErrorCode};

use crate::imei::is_valid_imei;
use crate::models::{json_flag, PublicReport, Report, ReportPatch, ReportStatus, ReportSubmission};
use crate::store::ReportStore;

fn clean(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_imei(raw: &str) -> AppResult<&str> {
    let imei = raw.trim();
    if is_valid_imei(imei) {
        Ok(imei)
    } else {
        Err(AppError::new(ErrorCode::InvalidImei, "invalid IMEI"))
    }
}

/// Validate a public submission and persist it as a new report.
pub fn submit(store: &dyn ReportStore, submission: ReportSubmission) -> AppResult<Report> {
    let imei = require_imei(submission.imei.as_deref().unwrap_or_default())?.to_string();

    let status = submission
        .status
        .as_deref()
        .and_then(|s| s.trim().parse::<ReportStatus>().ok())
        .filter(ReportStatus::is_initial)
        .ok_or_else(|| AppError::new(ErrorCode::InvalidStatus, "invalid status (lost|stolen)"))?;

    let report = Report {
        reference: Uuid::new_v4(),
        imei,
        status,
        brand: clean(submission.brand),
        model: clean(submission.model),
        color: clean(submission.color),
        description: clean(submission.description),
        lost_date: clean(submission.lost_date),
        location: clean(submission.location),
        contact_name: clean(submission.contact_name),
        contact_email: clean(submission.contact_email),
        contact_phone: clean(submission.contact_phone),
        police_report: clean(submission.police_report),
        is_public: json_flag(&submission.is_public).unwrap_or(false),
        created_at: Utc::now(),
    };

    store.insert(&report)?;

    counter!("reports_created_total", "status" => report.status.as_str()).increment(1);
    tracing::info!(
        report_ref = %report.reference,
        status = %report.status,
        is_public = report.is_public,
        "report created"
    );

    Ok(report)
}

/// Public reports for `imei`, stripped to the public view.
pub fn public_lookup(
    store: &dyn ReportStore,
    imei: &str,
) -> AppResult<(String, Vec<PublicReport>)> {
    let imei = require_imei(imei)?;
    let reports = store
        .public_by_imei(imei)?
        .into_iter()
        .map(PublicReport::from)
        .collect();
    Ok((imei.to_string(), reports))
}

pub fn admin_list(store: &dyn ReportStore, limit: usize) -> AppResult<Vec<Report>> {
    Ok(store.recent(limit)?)
}

/// Apply the whitelisted part of `body` to the report behind `reference`.
pub fn admin_update(
    store: &dyn ReportStore,
    reference: &str,
    body: &Map<String, Value>,
) -> AppResult<ReportPatch> {
    let patch = ReportPatch::from_json(body);
    if patch.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyPatch, "no valid fields"));
    }

    let not_found = || AppError::new(ErrorCode::ReportNotFound, "report not found");
    let reference = Uuid::parse_str(reference).map_err(|_| not_found())?;

    if !store.apply_patch(reference, &patch)? {
        return Err(not_found());
    }

    counter!("reports_updated_total").increment(1);
    tracing::info!(
        report_ref = %reference,
        status = ?patch.status,
        is_public = ?patch.is_public,
        "report updated by admin"
    );

    Ok(patch)
}
