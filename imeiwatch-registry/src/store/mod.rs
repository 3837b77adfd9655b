//! Report persistence.
//!
//! Handlers only see [`ReportStore`]; the Postgres backend is used in
//! deployments and the in-memory backend for local runs and tests.

mod memory;
mod pg;

pub use memory::MemoryReportStore;
pub use pg::{PgReportStore, SCHEMA_SQL};

use uuid::Uuid;

use imeiwatch_shared::errors::AppError;

use crate::models::{Report, ReportPatch};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("db pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("db error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("corrupt report row: {0}")]
    Corrupt(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::internal(err.to_string())
    }
}

pub trait ReportStore: Send + Sync {
    fn insert(&self, report: &Report) -> Result<(), StoreError>;

    /// Public reports for one IMEI, newest first.
    fn public_by_imei(&self, imei: &str) -> Result<Vec<Report>, StoreError>;

    /// Most recent reports across all IMEIs and visibilities, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<Report>, StoreError>;

    /// Returns `false` when no report has this reference.
    fn apply_patch(&self, reference: Uuid, patch: &ReportPatch) -> Result<bool, StoreError>;

    fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}
