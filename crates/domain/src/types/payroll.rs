//! Payroll scope and summary types
//!
//! Payroll is a derived view: nothing here is persisted, every summary is
//! recomputed from the attendance ledger on request.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::{Result, SiteLedgerError};

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `from > to`.
    ///
    /// # Errors
    /// Returns `SiteLedgerError::InvalidArgument` for an inverted range.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    fn validate(&self) -> Result<()> {
        if self.from > self.to {
            return Err(SiteLedgerError::invalid(
                "date_range",
                format!("from {} is after to {}", self.from, self.to),
            ));
        }
        Ok(())
    }
}

/// Filter for a payroll query
///
/// `org_id` is mandatory; an empty or missing org never widens the query to
/// every organization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayrollScope {
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
}

impl PayrollScope {
    pub fn for_org(org_id: impl Into<String>) -> Self {
        Self { org_id: org_id.into(), project_id: None, date_range: None }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_dates(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// # Errors
    /// Returns `SiteLedgerError::InvalidArgument` when the org is missing,
    /// the project filter is blank, or the date range is inverted.
    pub fn validate(&self) -> Result<()> {
        if self.org_id.trim().is_empty() {
            return Err(SiteLedgerError::invalid("org_id", "payroll scope requires an organization"));
        }
        if self.project_id.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(SiteLedgerError::invalid("project_id", "must not be blank when given"));
        }
        if let Some(range) = &self.date_range {
            range.validate()?;
        }
        Ok(())
    }
}

/// Per-worker payroll row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    pub worker_id: String,
    pub days_present: u32,
    pub days_half: u32,
    pub days_overtime: u32,
    pub days_absent: u32,
    pub overtime_hours: Decimal,
    /// Deductions actually applied. Deductions on absent days are not
    /// applied and are not counted here.
    pub deductions: Money,
    pub gross_pay: Money,
    /// Set when the worker's rate could not be resolved; `gross_pay` is
    /// then zero.
    pub rate_missing: bool,
    /// Set when the worker's pay does not fit in a decimal; `gross_pay` is
    /// then zero.
    #[serde(default)]
    pub pay_overflowed: bool,
}

impl PayrollLine {
    pub fn empty(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            days_present: 0,
            days_half: 0,
            days_overtime: 0,
            days_absent: 0,
            overtime_hours: Decimal::ZERO,
            deductions: Money::ZERO,
            gross_pay: Money::ZERO,
            rate_missing: false,
            pay_overflowed: false,
        }
    }

    /// Whether this worker's pay was left out of the total.
    pub fn is_excluded(&self) -> bool {
        self.rate_missing || self.pay_overflowed
    }
}

/// Non-fatal problem isolated to one worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollWarning {
    pub worker_id: String,
    pub message: String,
}

/// Result of a payroll query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub org_id: String,
    pub total_payroll: Money,
    /// Ordered by worker id.
    pub per_worker: Vec<PayrollLine>,
    pub warnings: Vec<PayrollWarning>,
}

impl PayrollSummary {
    /// Inline note for the payroll screen, if any worker was left unpaid.
    pub fn warning_note(&self) -> Option<String> {
        match self.warnings.len() {
            0 => None,
            1 => Some("1 worker could not be paid and was excluded".to_string()),
            n => Some(format!("{n} workers could not be paid and were excluded")),
        }
    }

    pub fn line_for(&self, worker_id: &str) -> Option<&PayrollLine> {
        self.per_worker.iter().find(|line| line.worker_id == worker_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert!(range.contains(date(2024, 3, 1)));
        assert!(range.contains(date(2024, 3, 31)));
        assert!(!range.contains(date(2024, 4, 1)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(DateRange::new(date(2024, 3, 2), date(2024, 3, 1)).is_err());
    }

    #[test]
    fn scope_without_org_is_invalid() {
        let scope: PayrollScope = serde_json::from_str(r#"{ "project_id": "p-1" }"#).unwrap();
        let err = scope.validate().unwrap_err();
        assert!(matches!(err, SiteLedgerError::InvalidArgument { ref field, .. } if field == "org_id"));
    }

    #[test]
    fn warning_note_counts_workers() {
        let mut summary = PayrollSummary {
            org_id: "org-a".into(),
            total_payroll: Money::ZERO,
            per_worker: Vec::new(),
            warnings: Vec::new(),
        };
        assert_eq!(summary.warning_note(), None);

        for id in ["w-1", "w-2"] {
            summary
                .warnings
                .push(PayrollWarning { worker_id: id.into(), message: "no rate".into() });
        }
        assert_eq!(
            summary.warning_note().as_deref(),
            Some("2 workers could not be paid and were excluded")
        );
    }
}
