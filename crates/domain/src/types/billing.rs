//! Running-account (RA) bill types
//!
//! Bill totals are a snapshot taken when the bill is created. They are never
//! recomputed from the line list afterwards, so an approved bill's figures
//! cannot change underneath an export.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// Approval state of an RA bill
///
/// `Draft -> Approved` is the only transition; approval is permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Draft,
    Approved,
}

crate::impl_domain_status_conversions!(BillStatus, "status" {
    Draft => "draft",
    Approved => "approved",
});

/// Caller input for one measured work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBillLine {
    pub description: String,
    pub unit: String,
    pub rate: Money,
    /// Quantity carried in from earlier periods, as entered by the preparer.
    pub previous_quantity: Decimal,
    /// Quantity measured this period.
    pub current_quantity: Decimal,
}

impl NewBillLine {
    pub fn new(
        description: impl Into<String>,
        unit: impl Into<String>,
        rate: Money,
        previous_quantity: Decimal,
        current_quantity: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            unit: unit.into(),
            rate,
            previous_quantity,
            current_quantity,
        }
    }
}

/// Stored line of an RA bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingLineItem {
    pub id: String,
    pub bill_id: String,
    /// Zero-based insertion order within the bill.
    pub position: u32,
    pub description: String,
    pub unit: String,
    pub rate: Money,
    pub previous_quantity: Decimal,
    pub current_quantity: Decimal,
    /// Always `previous_quantity + current_quantity`.
    pub cumulative_quantity: Decimal,
    /// This period's billed value: `current_quantity * rate`.
    pub amount: Money,
}

/// Caller input for a new RA bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBill {
    pub org_id: String,
    pub project_id: String,
    pub bill_number: String,
    #[serde(default)]
    pub period_from: Option<NaiveDate>,
    #[serde(default)]
    pub period_to: Option<NaiveDate>,
    pub retention_percent: Decimal,
    pub lines: Vec<NewBillLine>,
    pub created_by: String,
}

/// The three monetary figures of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTotals {
    pub total_amount: Money,
    pub retention_amount: Money,
    pub net_amount: Money,
}

/// RA bill header with its frozen totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaBill {
    pub id: String,
    pub org_id: String,
    pub project_id: String,
    pub bill_number: String,
    pub period_from: Option<NaiveDate>,
    pub period_to: Option<NaiveDate>,
    pub retention_percent: Decimal,
    pub total_amount: Money,
    pub retention_amount: Money,
    pub net_amount: Money,
    pub status: BillStatus,
    pub created_by: String,
    pub created_at: i64,
    pub approved_by: Option<String>,
    pub approved_at: Option<i64>,
}

impl RaBill {
    pub fn totals(&self) -> BillTotals {
        BillTotals {
            total_amount: self.total_amount,
            retention_amount: self.retention_amount,
            net_amount: self.net_amount,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == BillStatus::Approved
    }
}

/// Bill header together with its lines in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillWithLines {
    pub bill: RaBill,
    pub lines: Vec<BillingLineItem>,
}

/// Result of a conditional `draft -> approved` update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// This call performed the transition.
    Approved(RaBill),
    /// Another call had already approved the bill; its record is returned
    /// unchanged.
    AlreadyApproved(RaBill),
}

impl ApprovalOutcome {
    pub fn into_bill(self) -> RaBill {
        match self {
            Self::Approved(bill) | Self::AlreadyApproved(bill) => bill,
        }
    }
}
