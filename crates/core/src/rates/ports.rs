//! Port interfaces for workers and rate lookup
//!
//! The worker roster is owned by the surrounding application; the engine
//! only reads rates and statuses from it.

use async_trait::async_trait;
use siteledger_domain::{Money, Result, Worker};

/// Trait for worker roster persistence and retrieval
#[async_trait]
pub trait WorkerRepository: Send + Sync {
    /// Get a worker by id within an organization
    async fn get_worker(&self, org_id: &str, worker_id: &str) -> Result<Option<Worker>>;

    /// List an organization's workers ordered by id
    async fn list_workers(&self, org_id: &str, include_inactive: bool) -> Result<Vec<Worker>>;

    /// Insert a worker or replace the existing one with the same key
    async fn save_worker(&self, worker: Worker) -> Result<()>;

    /// Soft-delete a worker. Returns `NotFound` if the worker does not exist.
    async fn deactivate_worker(&self, org_id: &str, worker_id: &str) -> Result<()>;
}

/// Trait for resolving a worker's current daily rate
///
/// `Ok(None)` means the worker has no resolvable rate. Aggregations treat
/// that as a per-worker warning, never as a failure of the whole query.
#[async_trait]
pub trait RateResolver: Send + Sync {
    async fn worker_rate(&self, org_id: &str, worker_id: &str) -> Result<Option<Money>>;
}
