use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::{ReportStore, StoreError};
use crate::models::{Report, ReportPatch};

/// Reports kept in insertion order behind a lock. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    rows: RwLock<Vec<Report>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, reference: Uuid) -> Option<Report> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|r| r.reference == reference)
            .cloned()
    }

    fn newest_first<'a>(rows: impl DoubleEndedIterator<Item = &'a Report>) -> Vec<Report> {
        // Reverse insertion order first so the stable sort keeps later inserts ahead on ties.
        let mut out: Vec<Report> = rows.rev().cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

impl ReportStore for MemoryReportStore {
    fn insert(&self, report: &Report) -> Result<(), StoreError> {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn public_by_imei(&self, imei: &str) -> Result<Vec<Report>, StoreError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(Self::newest_first(
            rows.iter().filter(|r| r.is_public && r.imei == imei),
        ))
    }

    fn recent(&self, limit: usize) -> Result<Vec<Report>, StoreError> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let mut out = Self::newest_first(rows.iter());
        out.truncate(limit);
        Ok(out)
    }

    fn apply_patch(&self, reference: Uuid, patch: &ReportPatch) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        match rows.iter_mut().find(|r| r.reference == reference) {
            Some(report) => {
                patch.apply(report);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
