//! Billing line engine
//!
//! Derives `cumulative_quantity = previous_quantity + current_quantity` and
//! `amount = current_quantity * rate` exactly. Whether `previous_quantity`
//! matches the prior period's cumulative quantity is left to the preparer;
//! [`BillingLineEngine::carry_forward`] only drafts it.

use std::sync::Arc;

use rust_decimal::Decimal;
use siteledger_domain::constants::{MAX_DESCRIPTION_LENGTH, MAX_UNIT_LENGTH};
use siteledger_domain::{
    ensure_non_negative, new_record_id, BillingLineItem, Money, NewBillLine, Result,
    SiteLedgerError,
};
use tracing::info;

use super::ports::BillRepository;
use crate::utils::validation::{require_max_len, require_text};

/// Derived quantities of a validated line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedLine {
    pub cumulative_quantity: Decimal,
    pub amount: Money,
}

/// Validate a line and derive its cumulative quantity and amount.
///
/// # Errors
/// `InvalidArgument` for an empty description, over-long text, a negative
/// rate or quantity, or a product too large to represent.
pub fn compute_line(line: &NewBillLine) -> Result<ComputedLine> {
    require_text("description", &line.description)?;
    require_max_len("description", &line.description, MAX_DESCRIPTION_LENGTH)?;
    require_max_len("unit", &line.unit, MAX_UNIT_LENGTH)?;
    ensure_non_negative("rate", line.rate)?;
    ensure_non_negative("previous_quantity", line.previous_quantity)?;
    ensure_non_negative("current_quantity", line.current_quantity)?;

    let cumulative_quantity = line
        .previous_quantity
        .checked_add(line.current_quantity)
        .ok_or_else(|| SiteLedgerError::invalid("current_quantity", "cumulative quantity overflows"))?;
    let amount = line
        .current_quantity
        .checked_mul(line.rate)
        .ok_or_else(|| SiteLedgerError::invalid("current_quantity", "amount overflows"))?;

    Ok(ComputedLine { cumulative_quantity, amount })
}

/// Build a stored line for `bill_id` at `position` from caller input.
pub fn build_line_item(bill_id: &str, position: u32, line: &NewBillLine) -> Result<BillingLineItem> {
    let computed = compute_line(line)?;
    Ok(BillingLineItem {
        id: new_record_id(),
        bill_id: bill_id.to_string(),
        position,
        description: line.description.trim().to_string(),
        unit: line.unit.trim().to_string(),
        rate: line.rate,
        previous_quantity: line.previous_quantity,
        current_quantity: line.current_quantity,
        cumulative_quantity: computed.cumulative_quantity,
        amount: computed.amount,
    })
}

/// Billing line engine service
///
/// Adding or editing lines never touches the bill's frozen totals.
pub struct BillingLineEngine {
    bills: Arc<dyn BillRepository>,
}

impl BillingLineEngine {
    pub fn new(bills: Arc<dyn BillRepository>) -> Self {
        Self { bills }
    }

    /// Append a line to a draft bill.
    ///
    /// # Errors
    /// - `InvalidArgument` when the line fails validation (nothing is written)
    /// - `NotFound` when the bill does not exist in the organization
    /// - `InvalidState` when the bill is already approved
    pub async fn add_line(
        &self,
        org_id: &str,
        bill_id: &str,
        line: NewBillLine,
    ) -> Result<BillingLineItem> {
        require_text("org_id", org_id)?;
        require_text("bill_id", bill_id)?;
        // Position is assigned by the store inside the draft-checked insert.
        let item = build_line_item(bill_id, 0, &line)?;

        let stored = self.bills.insert_line_if_draft(org_id, item).await?;
        info!(
            org_id,
            bill_id,
            line_id = %stored.id,
            position = stored.position,
            amount = %stored.amount,
            "bill line added"
        );
        Ok(stored)
    }

    /// Replace the content of a line on a draft bill, re-deriving its
    /// cumulative quantity and amount. Identity and position are kept.
    ///
    /// # Errors
    /// Same as [`Self::add_line`]; `NotFound` also covers an unknown line.
    pub async fn update_line(
        &self,
        org_id: &str,
        line_id: &str,
        line: NewBillLine,
    ) -> Result<BillingLineItem> {
        require_text("org_id", org_id)?;
        require_text("line_id", line_id)?;
        let computed = compute_line(&line)?;

        let existing = self
            .bills
            .get_line(org_id, line_id)
            .await?
            .ok_or_else(|| SiteLedgerError::NotFound(format!("no such bill line: {line_id}")))?;

        let updated = BillingLineItem {
            description: line.description.trim().to_string(),
            unit: line.unit.trim().to_string(),
            rate: line.rate,
            previous_quantity: line.previous_quantity,
            current_quantity: line.current_quantity,
            cumulative_quantity: computed.cumulative_quantity,
            amount: computed.amount,
            ..existing
        };

        let stored = self.bills.update_line_if_draft(org_id, updated).await?;
        info!(org_id, line_id, bill_id = %stored.bill_id, "bill line updated");
        Ok(stored)
    }

    /// Draft the next period's lines from an existing bill: each line's
    /// cumulative quantity becomes the new `previous_quantity` and the
    /// current quantity starts at zero.
    ///
    /// # Errors
    /// `NotFound` when the bill does not exist in the organization.
    pub async fn carry_forward(&self, org_id: &str, bill_id: &str) -> Result<Vec<NewBillLine>> {
        require_text("org_id", org_id)?;
        let bill = self
            .bills
            .get_bill(org_id, bill_id)
            .await?
            .ok_or_else(|| SiteLedgerError::NotFound(format!("no such bill: {bill_id}")))?;

        Ok(bill
            .lines
            .into_iter()
            .map(|line| NewBillLine {
                description: line.description,
                unit: line.unit,
                rate: line.rate,
                previous_quantity: line.cumulative_quantity,
                current_quantity: Decimal::ZERO,
            })
            .collect())
    }
}
