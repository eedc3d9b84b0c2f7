use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use rust_decimal::Decimal;
use service::account::MockAccountService;
use service::daily_summary::DailySummaryService;
use service::permission::Privilege;
use service::report::{MockReportService, Report};
use service::{MockPermissionService, ServiceError};
use time::macros::date;
use time::Date;
use timesheet_utils::WorkPeriod;
use uuid::Uuid;

use crate::daily_summary::{DailySummaryServiceDeps, DailySummaryServiceImpl};
use crate::test::account::{default_accountant, default_employee, default_employee_id};
use crate::test::error_test::*;

struct DailySummaryServiceDependencies {
    report_service: MockReportService,
    account_service: MockAccountService,
    permission_service: MockPermissionService,
    transaction_dao: MockTransactionDao,
}
impl DailySummaryServiceDeps for DailySummaryServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type ReportService = MockReportService;
    type AccountService = MockAccountService;
    type PermissionService = MockPermissionService;
    type TransactionDao = MockTransactionDao;
}
impl DailySummaryServiceDependencies {
    fn build_service(self) -> DailySummaryServiceImpl<DailySummaryServiceDependencies> {
        DailySummaryServiceImpl {
            report_service: self.report_service.into(),
            account_service: self.account_service.into(),
            permission_service: self.permission_service.into(),
            transaction_dao: self.transaction_dao.into(),
        }
    }
}

fn report(date: Date, start_hour: u8, end_hour: u8) -> Report {
    Report::new(
        Uuid::new_v4(),
        default_employee_id(),
        "Warehouse".into(),
        WorkPeriod::new(date, start_hour, date, end_hour).unwrap(),
        None,
        Uuid::nil(),
    )
}

fn build_dependencies() -> DailySummaryServiceDependencies {
    let report_service = MockReportService::new();
    let mut account_service = MockAccountService::new();
    let mut permission_service = MockPermissionService::new();
    let mut transaction_dao = MockTransactionDao::new();

    account_service
        .expect_get()
        .with(eq(default_employee_id()), always(), always())
        .returning(|_, _, _| Ok(default_employee()));
    permission_service
        .expect_check_permission()
        .with(eq(Privilege::ReviewReports), always(), always())
        .returning(|_, _, _| Ok(()));

    transaction_dao
        .expect_use_transaction()
        .returning(|_| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    DailySummaryServiceDependencies {
        report_service,
        account_service,
        permission_service,
        transaction_dao,
    }
}

#[tokio::test]
async fn test_summarize_with_overtime() {
    let mut deps = build_dependencies();
    deps.report_service
        .expect_get_by_user_and_date()
        .with(
            eq(default_employee_id()),
            eq(date!(2024 - 01 - 01)),
            always(),
            always(),
        )
        .returning(|_, date, _, _| {
            Ok([report(date, 6, 9), report(date, 10, 14), report(date, 15, 17)].into())
        });
    let service = deps.build_service();

    let summary = service
        .summarize(default_employee_id(), date!(2024 - 01 - 01), ().auth(), None)
        .await
        .unwrap();

    assert_eq!(date!(2024 - 01 - 01), summary.date);
    assert_eq!(Decimal::new(900, 2), summary.total_hours);
    assert_eq!(Decimal::new(800, 2), summary.regular_hours);
    assert_eq!(Decimal::new(100, 2), summary.overtime_hours);
    assert_eq!(3, summary.reports.len());
}

#[tokio::test]
async fn test_summarize_empty_day() {
    let mut deps = build_dependencies();
    deps.report_service
        .expect_get_by_user_and_date()
        .returning(|_, _, _, _| Ok([].into()));
    let service = deps.build_service();

    let summary = service
        .summarize(default_employee_id(), date!(2024 - 01 - 05), ().auth(), None)
        .await
        .unwrap();

    assert_eq!(Decimal::ZERO, summary.total_hours);
    assert_eq!(Decimal::ZERO, summary.regular_hours);
    assert_eq!(Decimal::ZERO, summary.overtime_hours);
    assert!(summary.reports.is_empty());
}

#[tokio::test]
async fn test_summarize_forbidden() {
    let mut deps = build_dependencies();
    deps.report_service
        .expect_get_by_user_and_date()
        .returning(|_, _, _, _| Err(ServiceError::Forbidden));
    let service = deps.build_service();

    let result = service
        .summarize(default_employee_id(), date!(2024 - 01 - 01), ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_summarize_unknown_user() {
    let mut deps = build_dependencies();
    let unknown_id = Uuid::new_v4();
    deps.report_service
        .expect_get_by_user_and_date()
        .returning(|_, _, _, _| Ok([].into()));
    deps.account_service
        .expect_get()
        .with(eq(unknown_id), always(), always())
        .returning(|id, _, _| Err(ServiceError::EntityNotFound(id)));
    let service = deps.build_service();

    let result = service
        .summarize(unknown_id, date!(2024 - 01 - 01), ().auth(), None)
        .await;
    test_not_found(&result, &unknown_id);
}

#[tokio::test]
async fn test_performance_newest_day_first() {
    let mut deps = build_dependencies();
    deps.report_service
        .expect_get_by_user()
        .with(eq(default_employee_id()), always(), always())
        .returning(|_, _, _| {
            Ok([
                report(date!(2024 - 01 - 02), 8, 12),
                report(date!(2024 - 01 - 01), 8, 17),
                report(date!(2024 - 01 - 02), 13, 20),
                report(date!(2024 - 01 - 01), 18, 20),
            ]
            .into())
        });
    let service = deps.build_service();

    let days = service
        .performance(default_employee_id(), ().auth(), None)
        .await
        .unwrap();

    assert_eq!(2, days.len());
    assert_eq!(date!(2024 - 01 - 02), days[0].date);
    assert_eq!(Decimal::new(11, 0), days[0].total_hours);
    assert_eq!(Decimal::new(3, 0), days[0].overtime_hours);
    assert_eq!(date!(2024 - 01 - 01), days[1].date);
    assert_eq!(Decimal::new(11, 0), days[1].total_hours);
    assert_eq!(2, days[1].reports.len());
}

#[tokio::test]
async fn test_performance_requires_employee() {
    let mut deps = build_dependencies();
    let accountant = default_accountant();
    let accountant_id = accountant.id;
    deps.account_service
        .expect_get()
        .returning(move |_, _, _| Ok(accountant.clone()));
    let service = deps.build_service();

    let result = service
        .performance(accountant_id, ().auth(), None)
        .await;
    test_not_found(&result, &accountant_id);
}

#[tokio::test]
async fn test_performance_forbidden() {
    let mut deps = build_dependencies();
    deps.permission_service.checkpoint();
    deps.permission_service
        .expect_check_permission()
        .returning(|_, _, _| Err(ServiceError::Forbidden));
    let service = deps.build_service();

    let result = service
        .performance(default_employee_id(), ().auth(), None)
        .await;
    test_forbidden(&result);
}
