//! Worker roster repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use siteledger_core::rates::ports::WorkerRepository as WorkerRepositoryPort;
use siteledger_domain::{Result as DomainResult, SiteLedgerError, Worker};
use tokio::task;

use super::columns::{decimal_column, decimal_text};
use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

/// SQLite-backed implementation of `WorkerRepository`
pub struct SqliteWorkerRepository {
    db: Arc<DbManager>,
}

impl SqliteWorkerRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkerRepositoryPort for SqliteWorkerRepository {
    async fn get_worker(&self, org_id: &str, worker_id: &str) -> DomainResult<Option<Worker>> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();
        let worker_id = worker_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Worker>> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT org_id, id, name, daily_rate, is_active
                 FROM workers WHERE org_id = ?1 AND id = ?2",
                params![&org_id, &worker_id],
                map_worker_row,
            )
            .optional()
            .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_workers(&self, org_id: &str, include_inactive: bool) -> DomainResult<Vec<Worker>> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Worker>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT org_id, id, name, daily_rate, is_active
                     FROM workers
                     WHERE org_id = ?1 AND (?2 OR is_active = 1)
                     ORDER BY id",
                )
                .map_err(map_sql_error)?;
            let rows = stmt
                .query_map(params![&org_id, include_inactive], map_worker_row)
                .map_err(map_sql_error)?;
            rows.collect::<rusqlite::Result<Vec<_>>>().map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save_worker(&self, worker: Worker) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO workers (org_id, id, name, daily_rate, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(org_id, id) DO UPDATE SET
                    name = excluded.name,
                    daily_rate = excluded.daily_rate,
                    is_active = excluded.is_active",
                params![
                    &worker.org_id,
                    &worker.id,
                    &worker.name,
                    decimal_text(&worker.daily_rate),
                    worker.is_active
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn deactivate_worker(&self, org_id: &str, worker_id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();
        let worker_id = worker_id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE workers SET is_active = 0 WHERE org_id = ?1 AND id = ?2",
                    params![&org_id, &worker_id],
                )
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(SiteLedgerError::NotFound(format!("no such worker: {worker_id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_worker_row(row: &Row<'_>) -> rusqlite::Result<Worker> {
    Ok(Worker {
        org_id: row.get(0)?,
        id: row.get(1)?,
        name: row.get(2)?,
        daily_rate: decimal_column(row, 3)?,
        is_active: row.get(4)?,
    })
}
