//! Macro for implementing Display and FromStr for status enums
//!
//! Status enums are persisted and exchanged as lowercase snake_case strings.
//! Parsing is case-insensitive and rejects unknown values with
//! [`SiteLedgerError::InvalidArgument`](crate::SiteLedgerError) so an unknown
//! attendance or bill status never reaches the ledgers.
//!
//! # Example
//!
//! ```rust
//! use siteledger_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ShiftStatus {
//!     Open,
//!     Closed,
//! }
//!
//! impl_domain_status_conversions!(ShiftStatus, "shift_status" {
//!     Open => "open",
//!     Closed => "closed",
//! });
//!
//! assert_eq!(ShiftStatus::Open.to_string(), "open");
//! assert_eq!("CLOSED".parse::<ShiftStatus>().unwrap(), ShiftStatus::Closed);
//! assert!("paused".parse::<ShiftStatus>().is_err());
//! ```

/// Implements Display, FromStr and `as_str` for status enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$field` - Field name reported in the `InvalidArgument` error
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident, $field:literal { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string form used for storage and display.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::SiteLedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    other => Err($crate::SiteLedgerError::invalid(
                        $field,
                        format!("unknown {} `{}`", stringify!($enum_name), other),
                    )),
                }
            }
        }
    };
}
