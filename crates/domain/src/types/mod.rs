//! Domain types and models

pub mod attendance;
pub mod billing;
pub mod money;
pub mod payroll;
pub mod worker;

use uuid::Uuid;

pub use attendance::{AttendanceMark, AttendanceRecord, AttendanceStatus};
pub use billing::{
    ApprovalOutcome, BillStatus, BillTotals, BillWithLines, BillingLineItem, NewBill,
    NewBillLine, RaBill,
};
pub use money::{ensure_non_negative, round_money, Money};
pub use payroll::{DateRange, PayrollLine, PayrollScope, PayrollSummary, PayrollWarning};
pub use worker::Worker;

/// Generate a new time-ordered record identifier (UUIDv7).
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current wall-clock time as Unix seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
