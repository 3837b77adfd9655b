use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::schema::reports;

// --- Status ---

/// Lifecycle of a report. A report opens as `Lost` or `Stolen`; the admin
/// may then move it to any of the three states, including back out of
/// `Recovered` when a device goes missing again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Lost,
    Stolen,
    Recovered,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [Self::Lost, Self::Stolen, Self::Recovered];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Stolen => "stolen",
            Self::Recovered => "recovered",
        }
    }

    /// Whether a new report may start in this state.
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Lost | Self::Stolen)
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(Self::Lost),
            "stolen" => Ok(Self::Stolen),
            "recovered" => Ok(Self::Recovered),
            _ => Err(format!("unknown status: {s}")),
        }
    }
}

// --- Report ---

/// Full report as seen by the administrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(rename = "ref")]
    pub reference: Uuid,
    pub imei: String,
    pub status: ReportStatus,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub lost_date: Option<String>,
    pub location: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub police_report: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Anonymous lookup view: no contact details, free-text description or police reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicReport {
    #[serde(rename = "ref")]
    pub reference: Uuid,
    pub imei: String,
    pub status: ReportStatus,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub lost_date: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for PublicReport {
    fn from(r: Report) -> Self {
        Self {
            reference: r.reference,
            imei: r.imei,
            status: r.status,
            brand: r.brand,
            model: r.model,
            color: r.color,
            lost_date: r.lost_date,
            location: r.location,
            created_at: r.created_at,
        }
    }
}

// --- Admin patch ---

/// Whitelisted admin mutation. Only `status` and `is_public` can change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportPatch {
    pub status: Option<ReportStatus>,
    pub is_public: Option<bool>,
}

impl ReportPatch {
    /// Keep the whitelisted keys that carry a valid value; drop everything else.
    pub fn from_json(body: &Map<String, Value>) -> Self {
        let mut patch = Self::default();
        for (key, value) in body {
            match key.as_str() {
                "status" => patch.status = value.as_str().and_then(|s| s.parse().ok()),
                "is_public" => patch.is_public = json_flag(value),
                other => tracing::debug!(field = other, "ignoring non-updatable field"),
            }
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.is_public.is_none()
    }

    pub fn apply(&self, report: &mut Report) {
        if let Some(status) = self.status {
            report.status = status;
        }
        if let Some(is_public) = self.is_public {
            report.is_public = is_public;
        }
    }
}

/// A JSON boolean, or the integers 0/1 sent by form-driven clients.
pub fn json_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

// --- Database rows ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = reports)]
pub struct ReportRow {
    pub id: i64,
    pub reference: Uuid,
    pub imei: String,
    pub status: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub lost_date: Option<String>,
    pub location: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub police_report: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = String;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Self {
            reference: row.reference,
            imei: row.imei,
            status: row.status.parse()?,
            brand: row.brand,
            model: row.model,
            color: row.color,
            description: row.description,
            lost_date: row.lost_date,
            location: row.location,
            contact_name: row.contact_name,
            contact_email: row.contact_email,
            contact_phone: row.contact_phone,
            police_report: row.police_report,
            is_public: row.is_public,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reports)]
pub struct NewReportRow<'a> {
    pub reference: Uuid,
    pub imei: &'a str,
    pub status: &'a str,
    pub brand: Option<&'a str>,
    pub model: Option<&'a str>,
    pub color: Option<&'a str>,
    pub description: Option<&'a str>,
    pub lost_date: Option<&'a str>,
    pub location: Option<&'a str>,
    pub contact_name: Option<&'a str>,
    pub contact_email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub police_report: Option<&'a str>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Report> for NewReportRow<'a> {
    fn from(r: &'a Report) -> Self {
        Self {
            reference: r.reference,
            imei: &r.imei,
            status: r.status.as_str(),
            brand: r.brand.as_deref(),
            model: r.model.as_deref(),
            color: r.color.as_deref(),
            description: r.description.as_deref(),
            lost_date: r.lost_date.as_deref(),
            location: r.location.as_deref(),
            contact_name: r.contact_name.as_deref(),
            contact_email: r.contact_email.as_deref(),
            contact_phone: r.contact_phone.as_deref(),
            police_report: r.police_report.as_deref(),
            is_public: r.is_public,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = reports)]
pub struct ReportChangeset {
    pub status: Option<&'static str>,
    pub is_public: Option<bool>,
}

impl From<&ReportPatch> for ReportChangeset {
    fn from(patch: &ReportPatch) -> Self {
        Self {
            status: patch.status.map(|s| s.as_str()),
            is_public: patch.is_public,
        }
    }
}

// --- Submission ---

/// Report fields as submitted by the public form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportSubmission {
    pub imei: Option<String>,
    pub status: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub lost_date: Option<String>,
    pub location: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub police_report: Option<String>,
    #[serde(default)]
    pub is_public: Value,
}
