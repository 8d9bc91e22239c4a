//! Payroll aggregation
//!
//! Payroll is recomputed from the attendance ledger on every query; there is
//! no stored total that could drift from the records it summarizes.

pub mod aggregator;

pub use aggregator::{aggregate_payroll, PayrollAggregator};
