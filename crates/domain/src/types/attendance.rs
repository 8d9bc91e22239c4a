//! Attendance types
//!
//! One [`AttendanceRecord`] exists per (organization, worker, calendar date).
//! A later mark for the same key replaces the earlier record in full.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// Attendance status for one worker-day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Overtime,
}

crate::impl_domain_status_conversions!(AttendanceStatus, "status" {
    Present => "present",
    Absent => "absent",
    HalfDay => "half_day",
    Overtime => "overtime",
});

/// Supervisor input for marking a worker on a date
///
/// `overtime_hours` and `deduction` default to zero when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub org_id: String,
    pub worker_id: String,
    pub project_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    #[serde(default)]
    pub deduction: Option<Money>,
    pub recorded_by: String,
}

impl AttendanceMark {
    /// Mark with no overtime and no deduction.
    pub fn new(
        org_id: impl Into<String>,
        worker_id: impl Into<String>,
        project_id: impl Into<String>,
        date: NaiveDate,
        status: AttendanceStatus,
        recorded_by: impl Into<String>,
    ) -> Self {
        Self {
            org_id: org_id.into(),
            worker_id: worker_id.into(),
            project_id: project_id.into(),
            date,
            status,
            overtime_hours: None,
            deduction: None,
            recorded_by: recorded_by.into(),
        }
    }

    pub fn with_overtime_hours(mut self, hours: Decimal) -> Self {
        self.overtime_hours = Some(hours);
        self
    }

    pub fn with_deduction(mut self, deduction: Money) -> Self {
        self.deduction = Some(deduction);
        self
    }
}

/// Stored attendance for one worker-day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub org_id: String,
    pub worker_id: String,
    pub project_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// Always zero unless `status` is [`AttendanceStatus::Overtime`].
    pub overtime_hours: Decimal,
    pub deduction: Money,
    pub recorded_by: String,
    /// Unix seconds of the write that produced this record.
    pub recorded_at: i64,
}
