//! Engine context - dependency injection container

use std::sync::Arc;

use siteledger_core::{
    AttendanceLedger, AttendanceRepository, BillAggregator, BillRepository, BillingLineEngine,
    PayrollAggregator, RateResolver, WorkerRateResolver, WorkerRepository,
};
use siteledger_domain::{Config, Result};
use tracing::info;

use crate::database::{
    DbManager, SqliteAttendanceRepository, SqliteBillRepository, SqliteWorkerRepository,
};

/// Holds the engine services wired to SQLite storage
pub struct EngineContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub workers: Arc<dyn WorkerRepository>,
    pub rates: Arc<dyn RateResolver>,
    pub attendance: AttendanceLedger,
    pub payroll: PayrollAggregator,
    pub bill_lines: BillingLineEngine,
    pub bills: BillAggregator,
}

impl EngineContext {
    /// Validate `config`, open the database, apply the schema and wire every
    /// service.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Arc::new(DbManager::from_config(&config.database)?);
        db.run_migrations()?;

        let workers: Arc<dyn WorkerRepository> =
            Arc::new(SqliteWorkerRepository::new(Arc::clone(&db)));
        let attendance_repo: Arc<dyn AttendanceRepository> =
            Arc::new(SqliteAttendanceRepository::new(Arc::clone(&db)));
        let bill_repo: Arc<dyn BillRepository> =
            Arc::new(SqliteBillRepository::new(Arc::clone(&db)));
        let rates: Arc<dyn RateResolver> =
            Arc::new(WorkerRateResolver::new(Arc::clone(&workers)));

        let standard_day_hours = config.payroll.standard_day_hours;
        let context = Self {
            attendance: AttendanceLedger::new(Arc::clone(&workers), Arc::clone(&attendance_repo))
                .with_standard_day_hours(standard_day_hours),
            payroll: PayrollAggregator::new(attendance_repo, Arc::clone(&rates))
                .with_standard_day_hours(standard_day_hours),
            bill_lines: BillingLineEngine::new(Arc::clone(&bill_repo)),
            bills: BillAggregator::new(bill_repo).with_money_scale(config.billing.money_scale),
            workers,
            rates,
            db,
            config,
        };

        info!(
            db_path = %context.db.path().display(),
            standard_day_hours,
            money_scale = context.config.billing.money_scale,
            "engine context ready"
        );
        Ok(context)
    }

    /// Build a context from [`crate::config::load`].
    pub fn from_environment() -> Result<Self> {
        Self::new(crate::config::load()?)
    }
}
