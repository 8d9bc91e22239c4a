//! Progress billing
//!
//! The line engine derives each measured item's cumulative quantity and
//! billed amount. The bill aggregator snapshots totals and retention when a
//! bill is created and drives the `draft -> approved` state machine.

pub mod aggregator;
pub mod line_engine;
pub mod ports;

pub use aggregator::{compute_totals, BillAggregator};
pub use line_engine::{build_line_item, compute_line, BillingLineEngine, ComputedLine};
