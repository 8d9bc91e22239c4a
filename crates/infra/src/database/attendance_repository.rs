//! Attendance ledger repository implementation using SQLite
//!
//! The ledger keeps one row per (org, worker, date). Writes go through a
//! single `INSERT ... ON CONFLICT DO UPDATE` so concurrent marks for the
//! same key serialize inside SQLite and the last one wins whole.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row, ToSql};
use siteledger_core::attendance::ports::AttendanceRepository as AttendanceRepositoryPort;
use siteledger_domain::{AttendanceRecord, PayrollScope, Result as DomainResult};
use tokio::task;

use super::columns::{decimal_column, decimal_text, parsed_column};
use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

const SELECT_COLUMNS: &str = "SELECT org_id, worker_id, project_id, date, status, overtime_hours,
        deduction, recorded_by, recorded_at
 FROM attendance";

/// SQLite-backed implementation of `AttendanceRepository`
pub struct SqliteAttendanceRepository {
    db: Arc<DbManager>,
}

impl SqliteAttendanceRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttendanceRepositoryPort for SqliteAttendanceRepository {
    async fn upsert(&self, record: AttendanceRecord) -> DomainResult<AttendanceRecord> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<AttendanceRecord> {
            let conn = db.get_connection()?;
            let status = record.status.as_str();
            let overtime_hours = decimal_text(&record.overtime_hours);
            let deduction = decimal_text(&record.deduction);
            let params: [&dyn ToSql; 9] = [
                &record.org_id,
                &record.worker_id,
                &record.date,
                &record.project_id,
                &status,
                &overtime_hours,
                &deduction,
                &record.recorded_by,
                &record.recorded_at,
            ];

            conn.execute(
                "INSERT INTO attendance (
                    org_id, worker_id, date, project_id, status, overtime_hours,
                    deduction, recorded_by, recorded_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(org_id, worker_id, date) DO UPDATE SET
                    project_id = excluded.project_id,
                    status = excluded.status,
                    overtime_hours = excluded.overtime_hours,
                    deduction = excluded.deduction,
                    recorded_by = excluded.recorded_by,
                    recorded_at = excluded.recorded_at",
                params.as_slice(),
            )
            .map_err(map_sql_error)?;

            Ok(record)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find(
        &self,
        org_id: &str,
        worker_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Option<AttendanceRecord>> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();
        let worker_id = worker_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<AttendanceRecord>> {
            let conn = db.get_connection()?;
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE org_id = ?1 AND worker_id = ?2 AND date = ?3"),
                params![&org_id, &worker_id, &date],
                map_attendance_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, scope: &PayrollScope) -> DomainResult<Vec<AttendanceRecord>> {
        let db = Arc::clone(&self.db);
        let scope = scope.clone();

        task::spawn_blocking(move || -> DomainResult<Vec<AttendanceRecord>> {
            let conn = db.get_connection()?;

            let mut sql = format!("{SELECT_COLUMNS} WHERE org_id = ?1");
            let mut args: Vec<&dyn ToSql> = vec![&scope.org_id];
            if let Some(project_id) = &scope.project_id {
                args.push(project_id);
                sql.push_str(&format!(" AND project_id = ?{}", args.len()));
            }
            if let Some(range) = &scope.date_range {
                args.push(&range.from);
                sql.push_str(&format!(" AND date >= ?{}", args.len()));
                args.push(&range.to);
                sql.push_str(&format!(" AND date <= ?{}", args.len()));
            }
            sql.push_str(" ORDER BY worker_id, date");

            let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
            let rows =
                stmt.query_map(args.as_slice(), map_attendance_row).map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_attendance_row(row: &Row<'_>) -> rusqlite::Result<AttendanceRecord> {
    Ok(AttendanceRecord {
        org_id: row.get(0)?,
        worker_id: row.get(1)?,
        project_id: row.get(2)?,
        date: row.get(3)?,
        status: parsed_column(row, 4)?,
        overtime_hours: decimal_column(row, 5)?,
        deduction: decimal_column(row, 6)?,
        recorded_by: row.get(7)?,
        recorded_at: row.get(8)?,
    })
}
