//! Mock repository implementations for testing
//!
//! In-memory versions of the core storage ports. Each mock keeps its state
//! behind a single mutex so the conditional writes are atomic in the same
//! way the SQLite implementations are.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use siteledger_core::{AttendanceRepository, BillRepository, WorkerRepository};
use siteledger_domain::{
    ApprovalOutcome, AttendanceRecord, BillStatus, BillWithLines, BillingLineItem, PayrollScope,
    RaBill, Result as DomainResult, SiteLedgerError, Worker,
};

/// In-memory mock for `WorkerRepository`.
#[derive(Default, Clone)]
pub struct MockWorkerRepository {
    workers: Arc<Mutex<BTreeMap<(String, String), Worker>>>,
}

impl MockWorkerRepository {
    pub fn new(workers: Vec<Worker>) -> Self {
        let map = workers.into_iter().map(|w| ((w.org_id.clone(), w.id.clone()), w)).collect();
        Self { workers: Arc::new(Mutex::new(map)) }
    }
}

#[async_trait]
impl WorkerRepository for MockWorkerRepository {
    async fn get_worker(&self, org_id: &str, worker_id: &str) -> DomainResult<Option<Worker>> {
        let workers = self.workers.lock().unwrap();
        Ok(workers.get(&(org_id.to_string(), worker_id.to_string())).cloned())
    }

    async fn list_workers(&self, org_id: &str, include_inactive: bool) -> DomainResult<Vec<Worker>> {
        let workers = self.workers.lock().unwrap();
        Ok(workers
            .values()
            .filter(|w| w.org_id == org_id && (include_inactive || w.is_active))
            .cloned()
            .collect())
    }

    async fn save_worker(&self, worker: Worker) -> DomainResult<()> {
        let mut workers = self.workers.lock().unwrap();
        workers.insert((worker.org_id.clone(), worker.id.clone()), worker);
        Ok(())
    }

    async fn deactivate_worker(&self, org_id: &str, worker_id: &str) -> DomainResult<()> {
        let mut workers = self.workers.lock().unwrap();
        match workers.get_mut(&(org_id.to_string(), worker_id.to_string())) {
            Some(worker) => {
                worker.is_active = false;
                Ok(())
            }
            None => Err(SiteLedgerError::NotFound(format!("no such worker: {worker_id}"))),
        }
    }
}

type AttendanceKey = (String, String, NaiveDate);

/// In-memory mock for `AttendanceRepository`.
///
/// Keyed by (org, worker, date); iteration order of the map gives the
/// worker-then-date ordering the port promises.
#[derive(Default, Clone)]
pub struct MockAttendanceRepository {
    records: Arc<Mutex<BTreeMap<AttendanceKey, AttendanceRecord>>>,
}

impl MockAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl AttendanceRepository for MockAttendanceRepository {
    async fn upsert(&self, record: AttendanceRecord) -> DomainResult<AttendanceRecord> {
        let key = (record.org_id.clone(), record.worker_id.clone(), record.date);
        self.records.lock().unwrap().insert(key, record.clone());
        Ok(record)
    }

    async fn find(
        &self,
        org_id: &str,
        worker_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Option<AttendanceRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.get(&(org_id.to_string(), worker_id.to_string(), date)).cloned())
    }

    async fn list(&self, scope: &PayrollScope) -> DomainResult<Vec<AttendanceRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|r| r.org_id == scope.org_id)
            .filter(|r| scope.project_id.as_ref().map_or(true, |p| *p == r.project_id))
            .filter(|r| scope.date_range.as_ref().map_or(true, |range| range.contains(r.date)))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct BillStore {
    bills: Vec<RaBill>,
    lines: Vec<BillingLineItem>,
}

impl BillStore {
    fn bill_mut(&mut self, org_id: &str, bill_id: &str) -> DomainResult<&mut RaBill> {
        self.bills
            .iter_mut()
            .find(|b| b.org_id == org_id && b.id == bill_id)
            .ok_or_else(|| SiteLedgerError::NotFound(format!("no such bill: {bill_id}")))
    }

    fn ensure_draft(&mut self, org_id: &str, bill_id: &str) -> DomainResult<()> {
        let bill = self.bill_mut(org_id, bill_id)?;
        if bill.is_approved() {
            return Err(SiteLedgerError::InvalidState(format!("bill {bill_id} is approved")));
        }
        Ok(())
    }
}

/// In-memory mock for `BillRepository`.
#[derive(Default, Clone)]
pub struct MockBillRepository {
    store: Arc<Mutex<BillStore>>,
}

impl MockBillRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BillRepository for MockBillRepository {
    async fn insert_bill(&self, bill: &BillWithLines) -> DomainResult<()> {
        let mut store = self.store.lock().unwrap();
        let duplicate = store
            .bills
            .iter()
            .any(|b| b.org_id == bill.bill.org_id && b.bill_number == bill.bill.bill_number);
        if duplicate {
            return Err(SiteLedgerError::Conflict(format!(
                "bill number {} already exists",
                bill.bill.bill_number
            )));
        }
        store.bills.push(bill.bill.clone());
        store.lines.extend(bill.lines.iter().cloned());
        Ok(())
    }

    async fn get_bill(&self, org_id: &str, bill_id: &str) -> DomainResult<Option<BillWithLines>> {
        let store = self.store.lock().unwrap();
        let Some(bill) = store.bills.iter().find(|b| b.org_id == org_id && b.id == bill_id) else {
            return Ok(None);
        };
        let mut lines: Vec<BillingLineItem> =
            store.lines.iter().filter(|l| l.bill_id == bill_id).cloned().collect();
        lines.sort_by_key(|l| l.position);
        Ok(Some(BillWithLines { bill: bill.clone(), lines }))
    }

    async fn list_bills(&self, org_id: &str, project_id: Option<&str>) -> DomainResult<Vec<RaBill>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .bills
            .iter()
            .filter(|b| b.org_id == org_id && project_id.map_or(true, |p| b.project_id == p))
            .cloned()
            .collect())
    }

    async fn get_line(&self, org_id: &str, line_id: &str) -> DomainResult<Option<BillingLineItem>> {
        let store = self.store.lock().unwrap();
        let Some(line) = store.lines.iter().find(|l| l.id == line_id) else {
            return Ok(None);
        };
        let owned = store.bills.iter().any(|b| b.id == line.bill_id && b.org_id == org_id);
        Ok(owned.then(|| line.clone()))
    }

    async fn insert_line_if_draft(
        &self,
        org_id: &str,
        mut line: BillingLineItem,
    ) -> DomainResult<BillingLineItem> {
        let mut store = self.store.lock().unwrap();
        store.ensure_draft(org_id, &line.bill_id)?;
        line.position = store
            .lines
            .iter()
            .filter(|l| l.bill_id == line.bill_id)
            .map(|l| l.position + 1)
            .max()
            .unwrap_or(0);
        store.lines.push(line.clone());
        Ok(line)
    }

    async fn update_line_if_draft(
        &self,
        org_id: &str,
        line: BillingLineItem,
    ) -> DomainResult<BillingLineItem> {
        let mut store = self.store.lock().unwrap();
        store.ensure_draft(org_id, &line.bill_id)?;
        let slot = store
            .lines
            .iter_mut()
            .find(|l| l.id == line.id)
            .ok_or_else(|| SiteLedgerError::NotFound(format!("no such bill line: {}", line.id)))?;
        *slot = line.clone();
        Ok(line)
    }

    async fn approve_if_draft(
        &self,
        org_id: &str,
        bill_id: &str,
        approved_by: &str,
        approved_at: i64,
    ) -> DomainResult<ApprovalOutcome> {
        let mut store = self.store.lock().unwrap();
        let bill = store.bill_mut(org_id, bill_id)?;
        if bill.is_approved() {
            return Ok(ApprovalOutcome::AlreadyApproved(bill.clone()));
        }
        bill.status = BillStatus::Approved;
        bill.approved_by = Some(approved_by.to_string());
        bill.approved_at = Some(approved_at);
        Ok(ApprovalOutcome::Approved(bill.clone()))
    }
}
