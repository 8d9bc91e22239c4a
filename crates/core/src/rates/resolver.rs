//! Rate resolver backed by the worker roster

use std::sync::Arc;

use async_trait::async_trait;
use siteledger_domain::{Money, Result};
use tracing::debug;

use super::ports::{RateResolver, WorkerRepository};

/// Resolves daily rates from the worker repository.
///
/// Deactivated workers still resolve: attendance they accrued before
/// deactivation must remain payable.
pub struct WorkerRateResolver {
    workers: Arc<dyn WorkerRepository>,
}

impl WorkerRateResolver {
    pub fn new(workers: Arc<dyn WorkerRepository>) -> Self {
        Self { workers }
    }
}

#[async_trait]
impl RateResolver for WorkerRateResolver {
    async fn worker_rate(&self, org_id: &str, worker_id: &str) -> Result<Option<Money>> {
        let worker = self.workers.get_worker(org_id, worker_id).await?;
        if worker.is_none() {
            debug!(org_id, worker_id, "no worker found for rate lookup");
        }
        Ok(worker.map(|w| w.daily_rate))
    }
}
