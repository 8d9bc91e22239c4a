//! RA bill aggregator service
//!
//! Totals are computed once, at creation, from the supplied lines and then
//! stored with the bill. They are not recomputed on read, on later line
//! edits, or on approval.

use std::sync::Arc;

use rust_decimal::Decimal;
use siteledger_domain::constants::{
    DEFAULT_MONEY_SCALE, MAX_BILL_NUMBER_LENGTH, MAX_RETENTION_PERCENT, MIN_RETENTION_PERCENT,
};
use siteledger_domain::{
    new_record_id, round_money, unix_now, ApprovalOutcome, BillStatus, BillTotals, BillWithLines,
    BillingLineItem, Money, NewBill, RaBill, Result, SiteLedgerError,
};
use tracing::info;

use super::line_engine::build_line_item;
use super::ports::BillRepository;
use crate::utils::validation::{nest_field, require_max_len, require_text};

/// Sum line amounts and apply retention.
///
/// `retention_amount = round(total * retention_percent / 100)` at
/// `money_scale` decimal places; `net_amount = total - retention_amount`.
///
/// # Errors
/// `InvalidArgument` when `retention_percent` is outside `[0, 100]` or the
/// total overflows.
pub fn compute_totals(
    lines: &[BillingLineItem],
    retention_percent: Decimal,
    money_scale: u32,
) -> Result<BillTotals> {
    validate_retention(retention_percent)?;

    let total_amount = lines.iter().try_fold(Money::ZERO, |acc, line| {
        acc.checked_add(line.amount)
            .ok_or_else(|| SiteLedgerError::invalid("lines", "total amount overflows"))
    })?;
    let retention_amount = total_amount
        .checked_mul(retention_percent)
        .map(|scaled| round_money(scaled / Decimal::ONE_HUNDRED, money_scale))
        .ok_or_else(|| SiteLedgerError::invalid("retention_percent", "retention overflows"))?;

    Ok(BillTotals { total_amount, retention_amount, net_amount: total_amount - retention_amount })
}

fn validate_retention(retention_percent: Decimal) -> Result<()> {
    let min = Decimal::from(MIN_RETENTION_PERCENT);
    let max = Decimal::from(MAX_RETENTION_PERCENT);
    if retention_percent < min || retention_percent > max {
        return Err(SiteLedgerError::invalid(
            "retention_percent",
            format!("must be between {min} and {max}, got {retention_percent}"),
        ));
    }
    Ok(())
}

/// RA bill aggregator service
pub struct BillAggregator {
    bills: Arc<dyn BillRepository>,
    money_scale: u32,
}

impl BillAggregator {
    pub fn new(bills: Arc<dyn BillRepository>) -> Self {
        Self { bills, money_scale: DEFAULT_MONEY_SCALE }
    }

    pub fn with_money_scale(mut self, scale: u32) -> Self {
        self.money_scale = scale;
        self
    }

    /// Create a draft bill with totals frozen as of now.
    ///
    /// Every input, including every line, is validated before anything is
    /// written; the bill and its lines are then stored in one atomic write.
    ///
    /// # Errors
    /// - `InvalidArgument` for bad header fields, a retention outside
    ///   `[0, 100]`, an inverted period, or an invalid line (reported as
    ///   `lines[i].field`)
    /// - `Conflict` when the bill number is already used in the organization
    pub async fn create_bill(&self, request: NewBill) -> Result<BillWithLines> {
        require_text("org_id", &request.org_id)?;
        require_text("project_id", &request.project_id)?;
        require_text("bill_number", &request.bill_number)?;
        require_max_len("bill_number", &request.bill_number, MAX_BILL_NUMBER_LENGTH)?;
        require_text("created_by", &request.created_by)?;
        validate_retention(request.retention_percent)?;
        if let (Some(from), Some(to)) = (request.period_from, request.period_to) {
            if from > to {
                return Err(SiteLedgerError::invalid(
                    "period_from",
                    format!("period starts {from} after it ends {to}"),
                ));
            }
        }

        let bill_id = new_record_id();
        let lines = request
            .lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let position = u32::try_from(idx)
                    .map_err(|_| SiteLedgerError::invalid("lines", "too many lines"))?;
                build_line_item(&bill_id, position, line)
                    .map_err(|err| nest_field(&format!("lines[{idx}]"), err))
            })
            .collect::<Result<Vec<_>>>()?;

        let totals = compute_totals(&lines, request.retention_percent, self.money_scale)?;

        let bill = RaBill {
            id: bill_id,
            org_id: request.org_id,
            project_id: request.project_id,
            bill_number: request.bill_number.trim().to_string(),
            period_from: request.period_from,
            period_to: request.period_to,
            retention_percent: request.retention_percent,
            total_amount: totals.total_amount,
            retention_amount: totals.retention_amount,
            net_amount: totals.net_amount,
            status: BillStatus::Draft,
            created_by: request.created_by,
            created_at: unix_now(),
            approved_by: None,
            approved_at: None,
        };
        let created = BillWithLines { bill, lines };

        self.bills.insert_bill(&created).await?;
        info!(
            org_id = %created.bill.org_id,
            bill_id = %created.bill.id,
            bill_number = %created.bill.bill_number,
            lines = created.lines.len(),
            total = %created.bill.total_amount,
            net = %created.bill.net_amount,
            "RA bill created"
        );
        Ok(created)
    }

    /// Approve a draft bill.
    ///
    /// Approving an already-approved bill succeeds and returns the bill as
    /// first approved; `approved_by` and `approved_at` are not overwritten.
    ///
    /// # Errors
    /// `NotFound` when the bill does not exist in the organization.
    pub async fn approve(&self, org_id: &str, bill_id: &str, approved_by: &str) -> Result<RaBill> {
        require_text("org_id", org_id)?;
        require_text("bill_id", bill_id)?;
        require_text("approved_by", approved_by)?;

        let outcome = self.bills.approve_if_draft(org_id, bill_id, approved_by, unix_now()).await?;
        match &outcome {
            ApprovalOutcome::Approved(bill) => {
                info!(org_id, bill_id, approved_by, net = %bill.net_amount, "RA bill approved");
            }
            ApprovalOutcome::AlreadyApproved(bill) => {
                info!(
                    org_id,
                    bill_id,
                    first_approved_by = bill.approved_by.as_deref().unwrap_or_default(),
                    "RA bill already approved"
                );
            }
        }
        Ok(outcome.into_bill())
    }

    /// Get a bill and its lines in insertion order.
    ///
    /// # Errors
    /// `NotFound` when the bill does not exist in the organization.
    pub async fn get_bill(&self, org_id: &str, bill_id: &str) -> Result<BillWithLines> {
        require_text("org_id", org_id)?;
        self.bills
            .get_bill(org_id, bill_id)
            .await?
            .ok_or_else(|| SiteLedgerError::NotFound(format!("no such bill: {bill_id}")))
    }

    /// List an organization's bills, optionally for one project.
    pub async fn list_bills(&self, org_id: &str, project_id: Option<&str>) -> Result<Vec<RaBill>> {
        require_text("org_id", org_id)?;
        self.bills.list_bills(org_id, project_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(amount: &str) -> BillingLineItem {
        BillingLineItem {
            id: new_record_id(),
            bill_id: "b-1".into(),
            position: 0,
            description: "Item".into(),
            unit: "nos".into(),
            rate: d(amount),
            previous_quantity: Decimal::ZERO,
            current_quantity: Decimal::ONE,
            cumulative_quantity: Decimal::ONE,
            amount: d(amount),
        }
    }

    #[test]
    fn five_percent_retention_on_ten_thousand() {
        let totals = compute_totals(&[item("4000"), item("6000")], d("5"), 2).unwrap();
        assert_eq!(totals.total_amount, d("10000"));
        assert_eq!(totals.retention_amount, d("500"));
        assert_eq!(totals.net_amount, d("9500"));
    }

    #[test]
    fn retention_rounds_to_money_scale() {
        let totals = compute_totals(&[item("333.33")], d("2.5"), 2).unwrap();
        // 333.33 * 2.5 / 100 = 8.333250
        assert_eq!(totals.retention_amount, d("8.33"));
        assert_eq!(totals.net_amount, d("325.00"));
    }

    #[test]
    fn retention_bounds_are_inclusive() {
        assert!(compute_totals(&[item("100")], d("0"), 2).is_ok());
        let full = compute_totals(&[item("100")], d("100"), 2).unwrap();
        assert_eq!(full.net_amount, Decimal::ZERO);
    }

    #[test]
    fn retention_outside_range_is_rejected() {
        for pct in ["-0.01", "100.01"] {
            let err = compute_totals(&[item("100")], d(pct), 2).unwrap_err();
            assert!(matches!(
                err,
                SiteLedgerError::InvalidArgument { ref field, .. } if field == "retention_percent"
            ));
        }
    }

    #[test]
    fn no_lines_means_zero_totals() {
        let totals = compute_totals(&[], d("5"), 2).unwrap();
        assert_eq!(totals.total_amount, Decimal::ZERO);
        assert_eq!(totals.net_amount, Decimal::ZERO);
    }
}
