//! Input validation helpers
//!
//! Every check reports the offending field through
//! `SiteLedgerError::InvalidArgument` so callers can point at it.

use siteledger_domain::{Result, SiteLedgerError};

/// Require a non-blank text value.
pub fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SiteLedgerError::invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Require a value no longer than `max` characters.
pub fn require_max_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(SiteLedgerError::invalid(field, format!("must be at most {max} characters, got {len}")));
    }
    Ok(())
}

/// Prefix the field name of an `InvalidArgument` error, e.g. `lines[2].rate`.
pub fn nest_field(prefix: &str, err: SiteLedgerError) -> SiteLedgerError {
    match err {
        SiteLedgerError::InvalidArgument { field, reason } => {
            SiteLedgerError::InvalidArgument { field: format!("{prefix}.{field}"), reason }
        }
        other => other,
    }
}
