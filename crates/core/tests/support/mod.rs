//! Shared test helpers for `siteledger-core` integration tests.
//!
//! In-memory repositories and fixtures so the service tests can focus on
//! behaviour instead of storage.

#![allow(dead_code)]

pub mod repositories;

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use siteledger_domain::{Money, NewBill, NewBillLine, Worker};

pub use repositories::{MockAttendanceRepository, MockBillRepository, MockWorkerRepository};

pub const ORG_A: &str = "org-a";
pub const ORG_B: &str = "org-b";
pub const PROJECT: &str = "tower-b";

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("valid decimal literal")
}

pub fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).expect("valid March 2024 date")
}

/// Worker roster seeded with `(org, id, daily rate)` entries.
pub fn roster(entries: &[(&str, &str, i64)]) -> Arc<MockWorkerRepository> {
    let workers = entries
        .iter()
        .map(|(org, id, rate)| Worker::new(*org, *id, format!("Worker {id}"), Money::from(*rate)))
        .collect();
    Arc::new(MockWorkerRepository::new(workers))
}

pub fn bill_request(bill_number: &str, amounts: &[(&str, &str)]) -> NewBill {
    NewBill {
        org_id: ORG_A.into(),
        project_id: PROJECT.into(),
        bill_number: bill_number.into(),
        period_from: Some(march(1)),
        period_to: Some(march(31)),
        retention_percent: dec("5"),
        lines: amounts
            .iter()
            .map(|(qty, rate)| {
                NewBillLine::new("Brickwork 230mm", "cum", dec(rate), Decimal::ZERO, dec(qty))
            })
            .collect(),
        created_by: "qs-1".into(),
    }
}
