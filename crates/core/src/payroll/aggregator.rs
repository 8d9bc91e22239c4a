//! Payroll aggregator service

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use siteledger_domain::constants::DEFAULT_STANDARD_DAY_HOURS;
use siteledger_domain::{
    AttendanceRecord, AttendanceStatus, Money, PayrollLine, PayrollScope, PayrollSummary,
    PayrollWarning, Result,
};
use tracing::{info, warn};

use crate::attendance::ledger::day_pay;
use crate::attendance::ports::AttendanceRepository;
use crate::rates::ports::RateResolver;

/// Resolved daily rate per worker id; `None` marks an unresolvable rate.
pub type RateTable = BTreeMap<String, Option<Money>>;

/// Summarize attendance records into per-worker payroll rows.
///
/// Pure function of its inputs: records and rates are only read, and the
/// same inputs always produce the same summary. Records from organizations
/// other than `org_id` are ignored. Workers absent from `rates`, or mapped to
/// `None`, keep their day counts but earn nothing and are listed in
/// `warnings`. So are workers whose pay, or whose share of the total, does
/// not fit in a decimal.
pub fn aggregate_payroll(
    org_id: &str,
    records: &[AttendanceRecord],
    rates: &RateTable,
    standard_day_hours: u32,
) -> PayrollSummary {
    let mut lines: BTreeMap<&str, PayrollLine> = BTreeMap::new();

    for record in records.iter().filter(|r| r.org_id == org_id) {
        let line = lines
            .entry(record.worker_id.as_str())
            .or_insert_with(|| PayrollLine::empty(record.worker_id.clone()));

        match record.status {
            AttendanceStatus::Present => line.days_present += 1,
            AttendanceStatus::HalfDay => line.days_half += 1,
            AttendanceStatus::Overtime => line.days_overtime += 1,
            AttendanceStatus::Absent => line.days_absent += 1,
        }

        let rate = rates.get(&record.worker_id).copied().flatten();
        if rate.is_none() {
            line.rate_missing = true;
        }
        if !line.pay_overflowed
            && accumulate_day(line, record, rate, standard_day_hours).is_none()
        {
            line.pay_overflowed = true;
        }
    }

    let mut total_payroll = Money::ZERO;
    for line in lines.values_mut() {
        if line.is_excluded() {
            line.gross_pay = Money::ZERO;
            continue;
        }
        match total_payroll.checked_add(line.gross_pay) {
            Some(total) => total_payroll = total,
            None => {
                line.pay_overflowed = true;
                line.gross_pay = Money::ZERO;
            }
        }
    }

    let warnings = lines.values().filter_map(warning_for).collect();
    let per_worker: Vec<PayrollLine> = lines.into_values().collect();

    PayrollSummary { org_id: org_id.to_string(), total_payroll, per_worker, warnings }
}

/// Fold one record into a worker's running figures; `None` on overflow.
fn accumulate_day(
    line: &mut PayrollLine,
    record: &AttendanceRecord,
    rate: Option<Money>,
    standard_day_hours: u32,
) -> Option<()> {
    if record.status == AttendanceStatus::Overtime {
        line.overtime_hours = line.overtime_hours.checked_add(record.overtime_hours)?;
    }
    if record.status != AttendanceStatus::Absent {
        line.deductions = line.deductions.checked_add(record.deduction)?;
    }
    if let Some(rate) = rate {
        let pay = day_pay(
            record.status,
            rate,
            record.overtime_hours,
            record.deduction,
            standard_day_hours,
        )?;
        line.gross_pay = line.gross_pay.checked_add(pay)?;
    }
    Some(())
}

fn warning_for(line: &PayrollLine) -> Option<PayrollWarning> {
    let message = if line.rate_missing {
        "daily rate could not be resolved; pay excluded"
    } else if line.pay_overflowed {
        "pay exceeds the representable amount; pay excluded"
    } else {
        return None;
    };
    Some(PayrollWarning { worker_id: line.worker_id.clone(), message: message.to_string() })
}

/// Payroll aggregator service
pub struct PayrollAggregator {
    attendance: Arc<dyn AttendanceRepository>,
    rates: Arc<dyn RateResolver>,
    standard_day_hours: u32,
}

impl PayrollAggregator {
    pub fn new(attendance: Arc<dyn AttendanceRepository>, rates: Arc<dyn RateResolver>) -> Self {
        Self { attendance, rates, standard_day_hours: DEFAULT_STANDARD_DAY_HOURS }
    }

    pub fn with_standard_day_hours(mut self, hours: u32) -> Self {
        self.standard_day_hours = hours;
        self
    }

    /// Compute payroll for an organization, optionally narrowed to a
    /// project and an inclusive date range.
    ///
    /// A worker whose rate lookup fails or finds nothing is reported in
    /// `warnings` with zero gross pay; the rest of the payroll is unaffected.
    ///
    /// # Errors
    /// `InvalidArgument` for a scope without an organization or with an
    /// inverted date range; storage errors from listing attendance.
    pub async fn compute_payroll(&self, scope: &PayrollScope) -> Result<PayrollSummary> {
        scope.validate()?;

        let records: Vec<AttendanceRecord> = self
            .attendance
            .list(scope)
            .await?
            .into_iter()
            .filter(|record| in_scope(scope, record))
            .collect();

        let worker_ids: BTreeSet<&str> = records.iter().map(|r| r.worker_id.as_str()).collect();
        let mut rates = RateTable::new();
        for worker_id in worker_ids {
            let rate = match self.rates.worker_rate(&scope.org_id, worker_id).await {
                Ok(rate) => rate,
                Err(err) => {
                    warn!(org_id = %scope.org_id, worker_id, error = %err, "rate lookup failed");
                    None
                }
            };
            rates.insert(worker_id.to_string(), rate);
        }

        let summary = aggregate_payroll(&scope.org_id, &records, &rates, self.standard_day_hours);

        for warning in &summary.warnings {
            warn!(org_id = %scope.org_id, worker_id = %warning.worker_id, "{}", warning.message);
        }
        info!(
            org_id = %scope.org_id,
            workers = summary.per_worker.len(),
            records = records.len(),
            total = %summary.total_payroll,
            "payroll computed"
        );

        Ok(summary)
    }
}

fn in_scope(scope: &PayrollScope, record: &AttendanceRecord) -> bool {
    record.org_id == scope.org_id
        && scope.project_id.as_ref().map_or(true, |p| *p == record.project_id)
        && scope.date_range.as_ref().map_or(true, |range| range.contains(record.date))
}
