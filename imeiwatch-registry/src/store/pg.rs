use diesel::prelude::*;
use uuid::Uuid;

use imeiwatch_shared::clients::db::{DbConn, DbPool};

use super::{ReportStore, StoreError};
use crate::models::{NewReportRow, Report, ReportChangeset, ReportPatch, ReportRow};
use crate::schema::reports;

/// Idempotent DDL for the `reports` table, applied at start-up.
pub const SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-01-01-000000_create_reports/up.sql");

pub struct PgReportStore {
    pool: DbPool,
}

impl PgReportStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        Ok(self.pool.get()?)
    }
}

fn into_reports(rows: Vec<ReportRow>) -> Result<Vec<Report>, StoreError> {
    rows.into_iter()
        .map(|row| Report::try_from(row).map_err(StoreError::Corrupt))
        .collect()
}

impl ReportStore for PgReportStore {
    fn insert(&self, report: &Report) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::insert_into(reports::table)
            .values(NewReportRow::from(report))
            .execute(&mut conn)?;
        Ok(())
    }

    fn public_by_imei(&self, imei: &str) -> Result<Vec<Report>, StoreError> {
        let mut conn = self.conn()?;
        let rows = reports::table
            .filter(reports::imei.eq(imei))
            .filter(reports::is_public.eq(true))
            .order((reports::created_at.desc(), reports::id.desc()))
            .load::<ReportRow>(&mut conn)?;
        into_reports(rows)
    }

    fn recent(&self, limit: usize) -> Result<Vec<Report>, StoreError> {
        let mut conn = self.conn()?;
        let rows = reports::table
            .order((reports::created_at.desc(), reports::id.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .load::<ReportRow>(&mut conn)?;
        into_reports(rows)
    }

    fn apply_patch(&self, reference: Uuid, patch: &ReportPatch) -> Result<bool, StoreError> {
        let mut conn = self.conn()?;
        let changed = diesel::update(reports::table.filter(reports::reference.eq(reference)))
            .set(ReportChangeset::from(patch))
            .execute(&mut conn)?;
        Ok(changed > 0)
    }

    fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
