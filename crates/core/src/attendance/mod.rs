//! Attendance ledger
//!
//! Owns exactly one record per (organization, worker, date) and knows how
//! much a single marked day is worth. It never computes aggregates.

pub mod ledger;
pub mod ports;

pub use ledger::{day_pay, AttendanceLedger};
