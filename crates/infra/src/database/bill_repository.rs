//! RA bill repository implementation using SQLite
//!
//! Every state-dependent write is a single conditional statement (or one
//! transaction for bill creation). The draft check is never a separate
//! read followed by a write, so a bill approved concurrently can never
//! receive a new or edited line.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql, TransactionBehavior};
use siteledger_core::billing::ports::BillRepository as BillRepositoryPort;
use siteledger_domain::{
    ApprovalOutcome, BillStatus, BillWithLines, BillingLineItem, RaBill, Result as DomainResult,
    SiteLedgerError,
};
use tokio::task;
use tracing::debug;

use super::columns::{decimal_column, decimal_text, parsed_column};
use super::manager::DbManager;
use crate::errors::{map_join_error, map_sql_error};

const BILL_COLUMNS: &str = "SELECT id, org_id, project_id, bill_number, period_from, period_to,
        retention_percent, total_amount, retention_amount, net_amount, status,
        created_by, created_at, approved_by, approved_at
 FROM ra_bills";

const LINE_COLUMNS: &str = "SELECT l.id, l.bill_id, l.position, l.description, l.unit, l.rate,
        l.previous_quantity, l.current_quantity, l.cumulative_quantity, l.amount
 FROM bill_lines l JOIN ra_bills b ON b.id = l.bill_id";

/// SQLite-backed implementation of `BillRepository`
pub struct SqliteBillRepository {
    db: Arc<DbManager>,
}

impl SqliteBillRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BillRepositoryPort for SqliteBillRepository {
    async fn insert_bill(&self, bill: &BillWithLines) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let bill = bill.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            insert_bill_header(&tx, &bill.bill).map_err(|err| match map_sql_error(err) {
                SiteLedgerError::Conflict(_) => SiteLedgerError::Conflict(format!(
                    "bill number {} already exists in organization {}",
                    bill.bill.bill_number, bill.bill.org_id
                )),
                other => other,
            })?;
            for line in &bill.lines {
                insert_line(&tx, line).map_err(map_sql_error)?;
            }

            tx.commit().map_err(map_sql_error)?;
            debug!(bill_id = %bill.bill.id, lines = bill.lines.len(), "bill stored");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_bill(&self, org_id: &str, bill_id: &str) -> DomainResult<Option<BillWithLines>> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();
        let bill_id = bill_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<BillWithLines>> {
            let conn = db.get_connection()?;
            let Some(bill) = find_bill(&conn, &org_id, &bill_id)? else {
                return Ok(None);
            };

            let mut stmt = conn
                .prepare(&format!(
                    "{LINE_COLUMNS} WHERE l.bill_id = ?1 AND b.org_id = ?2 ORDER BY l.position"
                ))
                .map_err(map_sql_error)?;
            let lines = stmt
                .query_map(params![&bill_id, &org_id], map_line_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(Some(BillWithLines { bill, lines }))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_bills(&self, org_id: &str, project_id: Option<&str>) -> DomainResult<Vec<RaBill>> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();
        let project_id = project_id.map(str::to_string);

        task::spawn_blocking(move || -> DomainResult<Vec<RaBill>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "{BILL_COLUMNS}
                     WHERE org_id = ?1 AND (?2 IS NULL OR project_id = ?2)
                     ORDER BY created_at, rowid"
                ))
                .map_err(map_sql_error)?;
            let bills = stmt
                .query_map(params![&org_id, &project_id], map_bill_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(bills)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_line(&self, org_id: &str, line_id: &str) -> DomainResult<Option<BillingLineItem>> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();
        let line_id = line_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<BillingLineItem>> {
            let conn = db.get_connection()?;
            find_line(&conn, &org_id, &line_id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert_line_if_draft(
        &self,
        org_id: &str,
        line: BillingLineItem,
    ) -> DomainResult<BillingLineItem> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();

        task::spawn_blocking(move || -> DomainResult<BillingLineItem> {
            let conn = db.get_connection()?;
            let rate = decimal_text(&line.rate);
            let previous = decimal_text(&line.previous_quantity);
            let current = decimal_text(&line.current_quantity);
            let cumulative = decimal_text(&line.cumulative_quantity);
            let amount = decimal_text(&line.amount);
            let params: [&dyn ToSql; 10] = [
                &line.id,
                &line.bill_id,
                &line.description,
                &line.unit,
                &rate,
                &previous,
                &current,
                &cumulative,
                &amount,
                &org_id,
            ];

            let inserted = conn
                .execute(
                    "INSERT INTO bill_lines (
                        id, bill_id, position, description, unit, rate,
                        previous_quantity, current_quantity, cumulative_quantity, amount
                     )
                     SELECT ?1, b.id,
                            COALESCE((SELECT MAX(position) + 1 FROM bill_lines WHERE bill_id = b.id), 0),
                            ?3, ?4, ?5, ?6, ?7, ?8, ?9
                     FROM ra_bills b
                     WHERE b.id = ?2 AND b.org_id = ?10 AND b.status = 'draft'",
                    params.as_slice(),
                )
                .map_err(map_sql_error)?;

            if inserted == 0 {
                return Err(not_draft_error(bill_status(&conn, &org_id, &line.bill_id)?, &line.bill_id));
            }

            find_line(&conn, &org_id, &line.id)?.ok_or_else(|| {
                SiteLedgerError::Internal(format!("inserted line {} could not be read back", line.id))
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_line_if_draft(
        &self,
        org_id: &str,
        line: BillingLineItem,
    ) -> DomainResult<BillingLineItem> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();

        task::spawn_blocking(move || -> DomainResult<BillingLineItem> {
            let conn = db.get_connection()?;
            let rate = decimal_text(&line.rate);
            let previous = decimal_text(&line.previous_quantity);
            let current = decimal_text(&line.current_quantity);
            let cumulative = decimal_text(&line.cumulative_quantity);
            let amount = decimal_text(&line.amount);
            let params: [&dyn ToSql; 9] = [
                &line.description,
                &line.unit,
                &rate,
                &previous,
                &current,
                &cumulative,
                &amount,
                &line.id,
                &org_id,
            ];

            let updated = conn
                .execute(
                    "UPDATE bill_lines SET
                        description = ?1, unit = ?2, rate = ?3, previous_quantity = ?4,
                        current_quantity = ?5, cumulative_quantity = ?6, amount = ?7
                     WHERE id = ?8
                       AND bill_id IN (
                           SELECT id FROM ra_bills WHERE org_id = ?9 AND status = 'draft'
                       )",
                    params.as_slice(),
                )
                .map_err(map_sql_error)?;

            if updated == 0 {
                let status = conn
                    .query_row(
                        "SELECT b.status FROM bill_lines l JOIN ra_bills b ON b.id = l.bill_id
                         WHERE l.id = ?1 AND b.org_id = ?2",
                        params![&line.id, &org_id],
                        |row| parsed_column::<BillStatus>(row, 0),
                    )
                    .optional()
                    .map_err(map_sql_error)?;
                return Err(match status {
                    None => SiteLedgerError::NotFound(format!("no such bill line: {}", line.id)),
                    Some(_) => SiteLedgerError::InvalidState(format!(
                        "bill {} is approved; its lines can no longer change",
                        line.bill_id
                    )),
                });
            }

            find_line(&conn, &org_id, &line.id)?.ok_or_else(|| {
                SiteLedgerError::Internal(format!("updated line {} could not be read back", line.id))
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn approve_if_draft(
        &self,
        org_id: &str,
        bill_id: &str,
        approved_by: &str,
        approved_at: i64,
    ) -> DomainResult<ApprovalOutcome> {
        let db = Arc::clone(&self.db);
        let org_id = org_id.to_string();
        let bill_id = bill_id.to_string();
        let approved_by = approved_by.to_string();

        task::spawn_blocking(move || -> DomainResult<ApprovalOutcome> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE ra_bills SET status = 'approved', approved_by = ?1, approved_at = ?2
                     WHERE id = ?3 AND org_id = ?4 AND status = 'draft'",
                    params![&approved_by, approved_at, &bill_id, &org_id],
                )
                .map_err(map_sql_error)?;

            let bill = find_bill(&conn, &org_id, &bill_id)?
                .ok_or_else(|| SiteLedgerError::NotFound(format!("no such bill: {bill_id}")))?;

            Ok(if changed == 1 {
                ApprovalOutcome::Approved(bill)
            } else {
                ApprovalOutcome::AlreadyApproved(bill)
            })
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn insert_bill_header(conn: &Connection, bill: &RaBill) -> rusqlite::Result<()> {
    let retention_percent = decimal_text(&bill.retention_percent);
    let total_amount = decimal_text(&bill.total_amount);
    let retention_amount = decimal_text(&bill.retention_amount);
    let net_amount = decimal_text(&bill.net_amount);
    let status = bill.status.as_str();
    let params: [&dyn ToSql; 15] = [
        &bill.id,
        &bill.org_id,
        &bill.project_id,
        &bill.bill_number,
        &bill.period_from,
        &bill.period_to,
        &retention_percent,
        &total_amount,
        &retention_amount,
        &net_amount,
        &status,
        &bill.created_by,
        &bill.created_at,
        &bill.approved_by,
        &bill.approved_at,
    ];

    conn.execute(
        "INSERT INTO ra_bills (
            id, org_id, project_id, bill_number, period_from, period_to,
            retention_percent, total_amount, retention_amount, net_amount, status,
            created_by, created_at, approved_by, approved_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params.as_slice(),
    )?;
    Ok(())
}

fn insert_line(conn: &Connection, line: &BillingLineItem) -> rusqlite::Result<()> {
    let rate = decimal_text(&line.rate);
    let previous = decimal_text(&line.previous_quantity);
    let current = decimal_text(&line.current_quantity);
    let cumulative = decimal_text(&line.cumulative_quantity);
    let amount = decimal_text(&line.amount);
    let params: [&dyn ToSql; 10] = [
        &line.id,
        &line.bill_id,
        &line.position,
        &line.description,
        &line.unit,
        &rate,
        &previous,
        &current,
        &cumulative,
        &amount,
    ];

    conn.execute(
        "INSERT INTO bill_lines (
            id, bill_id, position, description, unit, rate,
            previous_quantity, current_quantity, cumulative_quantity, amount
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params.as_slice(),
    )?;
    Ok(())
}

fn find_bill(conn: &Connection, org_id: &str, bill_id: &str) -> DomainResult<Option<RaBill>> {
    conn.query_row(
        &format!("{BILL_COLUMNS} WHERE id = ?1 AND org_id = ?2"),
        params![bill_id, org_id],
        map_bill_row,
    )
    .optional()
    .map_err(map_sql_error)
}

fn find_line(
    conn: &Connection,
    org_id: &str,
    line_id: &str,
) -> DomainResult<Option<BillingLineItem>> {
    conn.query_row(
        &format!("{LINE_COLUMNS} WHERE l.id = ?1 AND b.org_id = ?2"),
        params![line_id, org_id],
        map_line_row,
    )
    .optional()
    .map_err(map_sql_error)
}

fn bill_status(conn: &Connection, org_id: &str, bill_id: &str) -> DomainResult<Option<BillStatus>> {
    conn.query_row(
        "SELECT status FROM ra_bills WHERE id = ?1 AND org_id = ?2",
        params![bill_id, org_id],
        |row| parsed_column(row, 0),
    )
    .optional()
    .map_err(map_sql_error)
}

/// Error for a conditional line write that matched no draft bill.
fn not_draft_error(status: Option<BillStatus>, bill_id: &str) -> SiteLedgerError {
    match status {
        None => SiteLedgerError::NotFound(format!("no such bill: {bill_id}")),
        Some(_) => SiteLedgerError::InvalidState(format!(
            "bill {bill_id} is approved; its lines can no longer change"
        )),
    }
}

fn map_bill_row(row: &Row<'_>) -> rusqlite::Result<RaBill> {
    Ok(RaBill {
        id: row.get(0)?,
        org_id: row.get(1)?,
        project_id: row.get(2)?,
        bill_number: row.get(3)?,
        period_from: row.get(4)?,
        period_to: row.get(5)?,
        retention_percent: decimal_column(row, 6)?,
        total_amount: decimal_column(row, 7)?,
        retention_amount: decimal_column(row, 8)?,
        net_amount: decimal_column(row, 9)?,
        status: parsed_column(row, 10)?,
        created_by: row.get(11)?,
        created_at: row.get(12)?,
        approved_by: row.get(13)?,
        approved_at: row.get(14)?,
    })
}

fn map_line_row(row: &Row<'_>) -> rusqlite::Result<BillingLineItem> {
    Ok(BillingLineItem {
        id: row.get(0)?,
        bill_id: row.get(1)?,
        position: row.get(2)?,
        description: row.get(3)?,
        unit: row.get(4)?,
        rate: decimal_column(row, 5)?,
        previous_quantity: decimal_column(row, 6)?,
        current_quantity: decimal_column(row, 7)?,
        cumulative_quantity: decimal_column(row, 8)?,
        amount: decimal_column(row, 9)?,
    })
}
