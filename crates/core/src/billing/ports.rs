//! Port interfaces for RA bill persistence

use async_trait::async_trait;
use siteledger_domain::{ApprovalOutcome, BillWithLines, BillingLineItem, RaBill, Result};

/// Trait for RA bill and bill line persistence
///
/// Every method is scoped by organization; a bill or line that exists under
/// another organization is reported as missing.
#[async_trait]
pub trait BillRepository: Send + Sync {
    /// Insert a bill header and all of its lines in one atomic write.
    ///
    /// Returns `Conflict` when the organization already has a bill with the
    /// same bill number.
    async fn insert_bill(&self, bill: &BillWithLines) -> Result<()>;

    /// Get a bill with its lines in insertion order
    async fn get_bill(&self, org_id: &str, bill_id: &str) -> Result<Option<BillWithLines>>;

    /// List bill headers ordered by creation time
    async fn list_bills(&self, org_id: &str, project_id: Option<&str>) -> Result<Vec<RaBill>>;

    /// Get a single line
    async fn get_line(&self, org_id: &str, line_id: &str) -> Result<Option<BillingLineItem>>;

    /// Append a line at the bill's next position, only while the bill is a
    /// draft. The draft check and the insert are one atomic operation.
    ///
    /// Returns the stored line with its assigned position. Fails with
    /// `NotFound` when the bill does not exist and `InvalidState` when it is
    /// no longer a draft.
    async fn insert_line_if_draft(
        &self,
        org_id: &str,
        line: BillingLineItem,
    ) -> Result<BillingLineItem>;

    /// Replace a line's content, only while its bill is a draft.
    ///
    /// Same error contract as [`Self::insert_line_if_draft`].
    async fn update_line_if_draft(
        &self,
        org_id: &str,
        line: BillingLineItem,
    ) -> Result<BillingLineItem>;

    /// Atomically set `status = approved` if and only if the bill is a draft.
    ///
    /// When the bill was already approved the stored record is returned
    /// untouched as [`ApprovalOutcome::AlreadyApproved`].
    async fn approve_if_draft(
        &self,
        org_id: &str,
        bill_id: &str,
        approved_by: &str,
        approved_at: i64,
    ) -> Result<ApprovalOutcome>;
}
