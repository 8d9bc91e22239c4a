//! # SiteLedger Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Rate resolution for workers
//! - The attendance ledger and its per-day pay formula
//! - The payroll aggregator (a pure view over the attendance ledger)
//! - The billing line engine and the RA bill aggregator
//! - Port interfaces (traits) for every storage collaborator
//!
//! ## Architecture Principles
//! - Only depends on `siteledger-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Every read takes an explicit organization id

pub mod attendance;
pub mod billing;
pub mod payroll;
pub mod rates;
pub mod utils;

// Re-export specific items to avoid ambiguity
pub use attendance::ports::AttendanceRepository;
pub use attendance::{day_pay, AttendanceLedger};
pub use billing::ports::BillRepository;
pub use billing::{compute_line, compute_totals, BillAggregator, BillingLineEngine, ComputedLine};
pub use payroll::{aggregate_payroll, PayrollAggregator};
pub use rates::ports::{RateResolver, WorkerRepository};
pub use rates::WorkerRateResolver;
