//! # SiteLedger Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories for workers, attendance and RA bills
//! - Connection pooling and schema migrations
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//! - [`EngineContext`], which wires the core services to storage
//!
//! ## Architecture
//! - Implements traits defined in `siteledger-core`
//! - Contains all "impure" code (file and database I/O)
//! - Blocking SQLite calls run on `tokio::task::spawn_blocking`

pub mod config;
pub mod context;
pub mod database;
pub mod errors;
pub mod observability;

// Re-export commonly used items
pub use context::EngineContext;
pub use database::*;
pub use errors::InfraError;
pub use observability::{init_tracing, LogFormat};
