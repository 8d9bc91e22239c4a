//! Conversions from external infrastructure errors into domain errors.

use rusqlite::Error as SqlError;
use siteledger_domain::SiteLedgerError;
use tokio::task::JoinError;

/// SQLite extended result codes the engine distinguishes.
const SQLITE_CONSTRAINT_FOREIGNKEY: i32 = 787;
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SiteLedgerError);

impl From<InfraError> for SiteLedgerError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SiteLedgerError> for InfraError {
    fn from(value: SiteLedgerError) -> Self {
        InfraError(value)
    }
}

trait IntoSiteLedgerError {
    fn into_siteledger(self) -> SiteLedgerError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SiteLedgerError */
/* -------------------------------------------------------------------------- */

impl IntoSiteLedgerError for SqlError {
    fn into_siteledger(self) -> SiteLedgerError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        SiteLedgerError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        SiteLedgerError::Database("database is locked".into())
                    }
                    (
                        ErrorCode::ConstraintViolation,
                        SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY,
                    ) => SiteLedgerError::Conflict(format!("unique constraint violation: {message}")),
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_FOREIGNKEY) => {
                        SiteLedgerError::NotFound("referenced record does not exist".into())
                    }
                    _ => SiteLedgerError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => SiteLedgerError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(column, _, cause) => SiteLedgerError::Database(format!(
                "failed to convert sqlite value in column {column}: {cause}"
            )),
            RE::InvalidColumnType(_, name, ty) => {
                SiteLedgerError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::Utf8Error(_) => {
                SiteLedgerError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidPath(path) => SiteLedgerError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => SiteLedgerError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_siteledger())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → SiteLedgerError */
/* -------------------------------------------------------------------------- */

impl IntoSiteLedgerError for r2d2::Error {
    fn into_siteledger(self) -> SiteLedgerError {
        SiteLedgerError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_siteledger())
    }
}

/* -------------------------------------------------------------------------- */
/* tokio::task::JoinError → SiteLedgerError */
/* -------------------------------------------------------------------------- */

impl IntoSiteLedgerError for JoinError {
    fn into_siteledger(self) -> SiteLedgerError {
        if self.is_panic() {
            SiteLedgerError::Internal(format!("blocking database task panicked: {self}"))
        } else {
            SiteLedgerError::Internal(format!("task join error: {self}"))
        }
    }
}

impl From<JoinError> for InfraError {
    fn from(value: JoinError) -> Self {
        InfraError(value.into_siteledger())
    }
}

pub(crate) fn map_sql_error(err: SqlError) -> SiteLedgerError {
    InfraError::from(err).into()
}

pub(crate) fn map_pool_error(err: r2d2::Error) -> SiteLedgerError {
    InfraError::from(err).into()
}

pub(crate) fn map_join_error(err: JoinError) -> SiteLedgerError {
    InfraError::from(err).into()
}
