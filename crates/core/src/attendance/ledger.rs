//! Attendance ledger service - core business logic

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use siteledger_domain::constants::{DEFAULT_STANDARD_DAY_HOURS, MAX_OVERTIME_HOURS_PER_DAY};
use siteledger_domain::{
    ensure_non_negative, unix_now, AttendanceMark, AttendanceRecord, AttendanceStatus, DateRange,
    Money, PayrollScope, Result, SiteLedgerError,
};
use tracing::info;

use super::ports::AttendanceRepository;
use crate::rates::ports::WorkerRepository;
use crate::utils::validation::require_text;

/// Gross pay contribution of one marked day.
///
/// - `present`: `rate - deduction`
/// - `half_day`: `rate / 2 - deduction`
/// - `overtime`: `rate + overtime_hours * rate / standard_day_hours - deduction`
/// - `absent`: zero; the deduction is not applied
///
/// The result is not clamped, so a deduction larger than the day's pay
/// yields a negative contribution. Returns `None` when the result does not
/// fit in a decimal.
pub fn day_pay(
    status: AttendanceStatus,
    rate: Money,
    overtime_hours: Decimal,
    deduction: Money,
    standard_day_hours: u32,
) -> Option<Money> {
    match status {
        AttendanceStatus::Present => rate.checked_sub(deduction),
        AttendanceStatus::HalfDay => rate.checked_div(Decimal::TWO)?.checked_sub(deduction),
        AttendanceStatus::Overtime => {
            let hours = Decimal::from(standard_day_hours.max(1));
            let extra = overtime_hours.checked_mul(rate)?.checked_div(hours)?;
            rate.checked_add(extra)?.checked_sub(deduction)
        }
        AttendanceStatus::Absent => Some(Money::ZERO),
    }
}

/// Attendance ledger service
pub struct AttendanceLedger {
    workers: Arc<dyn WorkerRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    standard_day_hours: u32,
}

impl AttendanceLedger {
    /// Create a ledger that values overtime against an 8-hour day.
    pub fn new(
        workers: Arc<dyn WorkerRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self { workers, attendance, standard_day_hours: DEFAULT_STANDARD_DAY_HOURS }
    }

    /// Override the standard day length used by [`Self::pay_for`].
    pub fn with_standard_day_hours(mut self, hours: u32) -> Self {
        self.standard_day_hours = hours;
        self
    }

    /// Mark a worker for a date, replacing any earlier mark for that day.
    ///
    /// The replacement is total: a caller changing only the deduction must
    /// re-supply the status. `overtime_hours` is stored as zero unless the
    /// status is `overtime`.
    ///
    /// # Errors
    /// - `InvalidArgument` for blank identifiers, negative hours/deduction,
    ///   or more overtime hours than a day holds
    /// - `NotFound` if the worker does not exist in the organization
    /// - `InvalidState` if the worker has been deactivated
    pub async fn record_attendance(&self, mark: AttendanceMark) -> Result<AttendanceRecord> {
        require_text("org_id", &mark.org_id)?;
        require_text("worker_id", &mark.worker_id)?;
        require_text("project_id", &mark.project_id)?;
        require_text("recorded_by", &mark.recorded_by)?;

        let overtime_hours = mark.overtime_hours.unwrap_or(Decimal::ZERO);
        let deduction = mark.deduction.unwrap_or(Money::ZERO);
        ensure_non_negative("overtime_hours", overtime_hours)?;
        ensure_non_negative("deduction", deduction)?;
        if overtime_hours > Decimal::from(MAX_OVERTIME_HOURS_PER_DAY) {
            return Err(SiteLedgerError::invalid(
                "overtime_hours",
                format!("at most {MAX_OVERTIME_HOURS_PER_DAY} hours per day, got {overtime_hours}"),
            ));
        }

        let worker =
            self.workers.get_worker(&mark.org_id, &mark.worker_id).await?.ok_or_else(|| {
                SiteLedgerError::NotFound(format!("no such worker: {}", mark.worker_id))
            })?;
        if !worker.is_active {
            return Err(SiteLedgerError::InvalidState(format!(
                "worker {} is deactivated",
                worker.id
            )));
        }

        let overtime_hours = if mark.status == AttendanceStatus::Overtime {
            overtime_hours
        } else {
            Decimal::ZERO
        };

        let record = AttendanceRecord {
            org_id: mark.org_id,
            worker_id: mark.worker_id,
            project_id: mark.project_id,
            date: mark.date,
            status: mark.status,
            overtime_hours,
            deduction,
            recorded_by: mark.recorded_by,
            recorded_at: unix_now(),
        };

        let stored = self.attendance.upsert(record).await?;
        info!(
            org_id = %stored.org_id,
            worker_id = %stored.worker_id,
            date = %stored.date,
            status = %stored.status,
            "attendance recorded"
        );
        Ok(stored)
    }

    /// Get the stored mark for one worker-day.
    pub async fn get_attendance(
        &self,
        org_id: &str,
        worker_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        require_text("org_id", org_id)?;
        require_text("worker_id", worker_id)?;
        self.attendance.find(org_id, worker_id, date).await
    }

    /// All marks for a project on one date (the daily marking sheet).
    pub async fn day_register(
        &self,
        org_id: &str,
        project_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let scope = PayrollScope::for_org(org_id)
            .with_project(project_id)
            .with_dates(DateRange::new(date, date)?);
        scope.validate()?;
        self.attendance.list(&scope).await
    }

    /// Pay contribution of a stored record at `rate`, or `None` on overflow.
    pub fn pay_for(&self, record: &AttendanceRecord, rate: Money) -> Option<Money> {
        day_pay(
            record.status,
            rate,
            record.overtime_hours,
            record.deduction,
            self.standard_day_hours,
        )
    }
}
