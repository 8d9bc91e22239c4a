//! Engine configuration structures

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DB_POOL_SIZE, DEFAULT_MONEY_SCALE, DEFAULT_STANDARD_DAY_HOURS, MAX_MONEY_SCALE,
};
use crate::{Result, SiteLedgerError};

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub payroll: PayrollConfig,
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Payroll computation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Length of a standard working day. One overtime hour is valued at
    /// `daily_rate / standard_day_hours`.
    pub standard_day_hours: u32,
}

/// Billing computation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Decimal places kept when rounding the retention amount.
    pub money_scale: u32,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self { standard_day_hours: DEFAULT_STANDARD_DAY_HOURS }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self { money_scale: DEFAULT_MONEY_SCALE }
    }
}

impl Config {
    /// Configuration for a database at `path` with default engine settings.
    pub fn with_database_path(path: impl Into<String>) -> Self {
        Self {
            database: DatabaseConfig { path: path.into(), pool_size: DEFAULT_DB_POOL_SIZE },
            payroll: PayrollConfig::default(),
            billing: BillingConfig::default(),
        }
    }

    /// Reject settings the engine cannot run with.
    ///
    /// # Errors
    /// Returns `SiteLedgerError::Config` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(SiteLedgerError::Config("database.path must not be empty".into()));
        }
        if self.database.pool_size == 0 {
            return Err(SiteLedgerError::Config("database.pool_size must be at least 1".into()));
        }
        if self.payroll.standard_day_hours == 0 {
            return Err(SiteLedgerError::Config(
                "payroll.standard_day_hours must be at least 1".into(),
            ));
        }
        if self.billing.money_scale > MAX_MONEY_SCALE {
            return Err(SiteLedgerError::Config(format!(
                "billing.money_scale must not exceed {MAX_MONEY_SCALE}"
            )));
        }
        Ok(())
    }
}

const fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}
