//! Rate resolution
//!
//! Leaf lookup that turns a worker reference into its current daily rate.
//! Line-item rates are supplied by the billing preparer and never looked up.

pub mod ports;
pub mod resolver;

pub use resolver::WorkerRateResolver;
