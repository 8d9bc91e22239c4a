//! Port interfaces for the attendance ledger

use async_trait::async_trait;
use chrono::NaiveDate;
use siteledger_domain::{AttendanceRecord, PayrollScope, Result};

/// Trait for attendance persistence
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert the record, or replace every field of the record already
    /// stored under the same (org, worker, date) key.
    ///
    /// Implementations must do this as one atomic keyed write. Two
    /// concurrent writers for the same key leave exactly one of the two
    /// records, never a mix.
    async fn upsert(&self, record: AttendanceRecord) -> Result<AttendanceRecord>;

    /// Get the record for one worker-day
    async fn find(
        &self,
        org_id: &str,
        worker_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>>;

    /// List records matching a scope, ordered by worker id then date
    ///
    /// The scope's organization filter is mandatory.
    async fn list(&self, scope: &PayrollScope) -> Result<Vec<AttendanceRecord>>;
}
