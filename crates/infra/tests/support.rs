//! Shared harness for `siteledger-infra` integration tests.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use siteledger_domain::{Config, Money, NewBill, NewBillLine, Worker};
use siteledger_infra::database::DbManager;
use siteledger_infra::EngineContext;
use tempfile::TempDir;

pub const ORG_A: &str = "org-a";
pub const ORG_B: &str = "org-b";
pub const PROJECT: &str = "tower-b";

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("siteledger-test.db");

        let manager = DbManager::new(&db_path, 8).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine context over a temporary database.
pub struct TestEngine {
    pub engine: Arc<EngineContext>,
    _temp_dir: TempDir,
}

impl TestEngine {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("siteledger-engine.db");
        let mut config = Config::with_database_path(db_path.to_string_lossy());
        config.database.pool_size = 8;

        let engine = EngineContext::new(config).expect("engine context should build");
        Self { engine: Arc::new(engine), _temp_dir: temp_dir }
    }
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("valid decimal literal")
}

pub fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).expect("valid March 2024 date")
}

pub fn worker(org: &str, id: &str, rate: i64) -> Worker {
    Worker::new(org, id, format!("Worker {id}"), Money::from(rate))
}

pub fn bill_request(org: &str, bill_number: &str, lines: &[(&str, &str)]) -> NewBill {
    NewBill {
        org_id: org.into(),
        project_id: PROJECT.into(),
        bill_number: bill_number.into(),
        period_from: Some(march(1)),
        period_to: Some(march(31)),
        retention_percent: dec("5"),
        lines: lines
            .iter()
            .map(|(qty, rate)| {
                NewBillLine::new("RCC M25 slab", "cum", dec(rate), Decimal::ZERO, dec(qty))
            })
            .collect(),
        created_by: "qs-1".into(),
    }
}
