//! Engine constants
//!
//! Centralized location for all domain-level constants used throughout the
//! engine.

// Payroll
pub const DEFAULT_STANDARD_DAY_HOURS: u32 = 8;
pub const MAX_OVERTIME_HOURS_PER_DAY: i64 = 24;

// Money precision (decimal places kept after rounding)
pub const DEFAULT_MONEY_SCALE: u32 = 2;
pub const MAX_MONEY_SCALE: u32 = 10;

// Retention bounds, in percent
pub const MIN_RETENTION_PERCENT: i64 = 0;
pub const MAX_RETENTION_PERCENT: i64 = 100;

// Free-text limits
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_UNIT_LENGTH: usize = 32;
pub const MAX_BILL_NUMBER_LENGTH: usize = 64;

// Storage
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
pub const DB_BUSY_TIMEOUT_MS: u64 = 5_000;
