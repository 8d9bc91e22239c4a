//! Payroll aggregation over the attendance ledger

mod support;

use std::sync::Arc;

use rust_decimal::Decimal;
use siteledger_core::{
    AttendanceLedger, AttendanceRepository, PayrollAggregator, WorkerRateResolver,
    WorkerRepository,
};
use siteledger_domain::{
    AttendanceMark, AttendanceStatus, DateRange, Money, PayrollScope, SiteLedgerError,
};
use support::{march, roster, MockAttendanceRepository, MockWorkerRepository, ORG_A, ORG_B, PROJECT};

struct Fixture {
    workers: Arc<MockWorkerRepository>,
    ledger: AttendanceLedger,
    payroll: PayrollAggregator,
}

fn fixture(entries: &[(&str, &str, i64)]) -> Fixture {
    let workers = roster(entries);
    let attendance: Arc<dyn AttendanceRepository> = Arc::new(MockAttendanceRepository::new());
    let rates = Arc::new(WorkerRateResolver::new(workers.clone()));
    Fixture {
        ledger: AttendanceLedger::new(workers.clone(), attendance.clone()),
        payroll: PayrollAggregator::new(attendance, rates),
        workers,
    }
}

async fn mark(fx: &Fixture, org: &str, worker: &str, day: u32, status: AttendanceStatus) {
    fx.ledger
        .record_attendance(AttendanceMark::new(org, worker, PROJECT, march(day), status, "sup-1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn same_worker_id_in_two_orgs_stays_separate() {
    let fx = fixture(&[(ORG_A, "w-1", 1000), (ORG_B, "w-1", 600)]);
    mark(&fx, ORG_A, "w-1", 1, AttendanceStatus::Present).await;
    mark(&fx, ORG_A, "w-1", 2, AttendanceStatus::Present).await;
    mark(&fx, ORG_B, "w-1", 1, AttendanceStatus::Present).await;

    let org_a = fx.payroll.compute_payroll(&PayrollScope::for_org(ORG_A)).await.unwrap();
    let org_b = fx.payroll.compute_payroll(&PayrollScope::for_org(ORG_B)).await.unwrap();

    assert_eq!(org_a.total_payroll, Money::from(2000));
    assert_eq!(org_a.line_for("w-1").unwrap().days_present, 2);
    assert_eq!(org_b.total_payroll, Money::from(600));
    assert_eq!(org_b.line_for("w-1").unwrap().days_present, 1);
}

#[tokio::test]
async fn date_range_and_project_narrow_the_scope() {
    let fx = fixture(&[(ORG_A, "w-1", 1000), (ORG_A, "w-2", 900)]);
    for day in 1..=5 {
        mark(&fx, ORG_A, "w-1", day, AttendanceStatus::Present).await;
    }
    let elsewhere =
        AttendanceMark::new(ORG_A, "w-2", "tower-c", march(3), AttendanceStatus::Present, "sup-1");
    fx.ledger.record_attendance(elsewhere).await.unwrap();

    let scope = PayrollScope::for_org(ORG_A)
        .with_project(PROJECT)
        .with_dates(DateRange::new(march(2), march(4)).unwrap());
    let summary = fx.payroll.compute_payroll(&scope).await.unwrap();

    assert_eq!(summary.line_for("w-1").unwrap().days_present, 3);
    assert!(summary.line_for("w-2").is_none());
    assert_eq!(summary.total_payroll, Money::from(3000));
}

#[tokio::test]
async fn computing_twice_gives_the_same_summary() {
    let fx = fixture(&[(ORG_A, "w-1", 1000), (ORG_A, "w-2", 750)]);
    mark(&fx, ORG_A, "w-2", 1, AttendanceStatus::HalfDay).await;
    mark(&fx, ORG_A, "w-1", 1, AttendanceStatus::Present).await;

    let scope = PayrollScope::for_org(ORG_A);
    let first = fx.payroll.compute_payroll(&scope).await.unwrap();
    let second = fx.payroll.compute_payroll(&scope).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.total_payroll, Money::from(1375));
}

#[tokio::test]
async fn deactivated_worker_is_still_paid_for_past_days() {
    let fx = fixture(&[(ORG_A, "w-1", 1000)]);
    mark(&fx, ORG_A, "w-1", 1, AttendanceStatus::Present).await;
    fx.workers.deactivate_worker(ORG_A, "w-1").await.unwrap();

    let summary = fx.payroll.compute_payroll(&PayrollScope::for_org(ORG_A)).await.unwrap();

    assert_eq!(summary.total_payroll, Money::from(1000));
    assert!(summary.warnings.is_empty());
}

#[tokio::test]
async fn worker_removed_from_roster_is_a_warning_not_a_failure() {
    let workers = roster(&[(ORG_A, "w-1", 1000), (ORG_A, "w-2", 500)]);
    let attendance: Arc<dyn AttendanceRepository> = Arc::new(MockAttendanceRepository::new());
    let ledger = AttendanceLedger::new(workers.clone(), attendance.clone());
    for worker in ["w-1", "w-2"] {
        ledger
            .record_attendance(AttendanceMark::new(
                ORG_A,
                worker,
                PROJECT,
                march(1),
                AttendanceStatus::Present,
                "sup-1",
            ))
            .await
            .unwrap();
    }
    // Rates come from a roster that no longer knows w-2.
    let rates = Arc::new(WorkerRateResolver::new(roster(&[(ORG_A, "w-1", 1000)])));
    let payroll = PayrollAggregator::new(attendance, rates);

    let summary = payroll.compute_payroll(&PayrollScope::for_org(ORG_A)).await.unwrap();

    assert_eq!(summary.total_payroll, Money::from(1000));
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(summary.warnings[0].worker_id, "w-2");
    assert!(summary.line_for("w-2").unwrap().rate_missing);
    assert_eq!(summary.warning_note().as_deref(), Some("1 worker could not be paid and was excluded"));
}

#[tokio::test]
async fn overflowing_pay_does_not_abort_payroll() {
    let fx = fixture(&[(ORG_A, "w-1", 1000), (ORG_A, "w-2", 800)]);
    let mut rich = fx.workers.get_worker(ORG_A, "w-1").await.unwrap().unwrap();
    rich.daily_rate = Decimal::MAX;
    fx.workers.save_worker(rich).await.unwrap();
    fx.ledger
        .record_attendance(
            AttendanceMark::new(ORG_A, "w-1", PROJECT, march(1), AttendanceStatus::Overtime, "sup-1")
                .with_overtime_hours(Decimal::from(24)),
        )
        .await
        .unwrap();
    mark(&fx, ORG_A, "w-2", 1, AttendanceStatus::Present).await;

    let summary = fx.payroll.compute_payroll(&PayrollScope::for_org(ORG_A)).await.unwrap();

    assert_eq!(summary.total_payroll, Money::from(800));
    assert_eq!(summary.line_for("w-2").unwrap().gross_pay, Money::from(800));
    let excluded = summary.line_for("w-1").unwrap();
    assert!(excluded.pay_overflowed);
    assert_eq!(excluded.days_overtime, 1);
    assert_eq!(excluded.gross_pay, Money::ZERO);
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(summary.warnings[0].worker_id, "w-1");
}

#[tokio::test]
async fn scope_without_org_is_rejected() {
    let fx = fixture(&[(ORG_A, "w-1", 1000)]);

    let err = fx.payroll.compute_payroll(&PayrollScope::for_org("")).await.unwrap_err();

    assert!(matches!(err, SiteLedgerError::InvalidArgument { ref field, .. } if field == "org_id"));
}

#[tokio::test]
async fn empty_ledger_gives_zero_payroll() {
    let fx = fixture(&[(ORG_A, "w-1", 1000)]);

    let summary = fx.payroll.compute_payroll(&PayrollScope::for_org(ORG_A)).await.unwrap();

    assert_eq!(summary.total_payroll, Money::ZERO);
    assert!(summary.per_worker.is_empty());
}
