//! Worker types
//!
//! Workers belong to an organization and are never hard-deleted once
//! attendance references them; deactivation is a soft delete.

use serde::{Deserialize, Serialize};

use super::money::Money;

/// A daily-wage worker on an organization's roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub org_id: String,
    pub id: String,
    pub name: String,
    /// Pay for one full present day.
    pub daily_rate: Money,
    pub is_active: bool,
}

impl Worker {
    /// Create an active worker.
    pub fn new(
        org_id: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
        daily_rate: Money,
    ) -> Self {
        Self {
            org_id: org_id.into(),
            id: id.into(),
            name: name.into(),
            daily_rate,
            is_active: true,
        }
    }
}
