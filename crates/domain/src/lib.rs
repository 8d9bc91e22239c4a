//! # SiteLedger Domain
//!
//! Business domain types for the SiteLedger payroll and progress-billing
//! engine.
//!
//! This crate contains:
//! - Worker, attendance, payroll and RA bill data types
//! - The exact-decimal money type and rounding helpers
//! - Domain error types and Result definitions
//! - Configuration structures and domain constants
//!
//! ## Architecture
//! - No dependencies on other SiteLedger crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
