use rest::RestStateDef;
use rust_decimal::Decimal;
use service::{
    account::{AccountService, Approval},
    daily_summary::DailySummaryService,
    dashboard::{Dashboard, DashboardService},
    permission::Authentication,
    report::{ReportService, ReportSubmission},
    Role, ServiceError,
};
use time::macros::date;

use crate::integration_test::{context, registration, TestSetup, PASSWORD};

fn submission(start_hour: u8, end_hour: u8) -> ReportSubmission {
    ReportSubmission {
        place_description: "Warehouse".into(),
        start_date: date!(2024 - 03 - 01),
        start_hour,
        end_date: date!(2024 - 03 - 01),
        end_hour,
    }
}

#[tokio::test]
async fn test_registration_waits_for_approval() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    test_setup.create_user("admin", Role::Staff).await;

    let maria = rest_state
        .account_service()
        .register(&registration("maria"), None)
        .await
        .unwrap();
    assert_eq!(Role::Employee, maria.role);
    assert!(maria.is_pending());

    let authenticated = rest_state
        .account_service()
        .authenticate("maria", PASSWORD, None)
        .await
        .unwrap();
    assert_eq!(maria.id, authenticated.id);

    let dashboard = rest_state
        .dashboard_service()
        .dashboard(context("maria"), None)
        .await
        .unwrap();
    assert!(matches!(dashboard, Dashboard::PendingApproval { .. }));

    let result = rest_state
        .report_service()
        .create(&submission(8, 12), context("maria"), None)
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let pending = rest_state
        .account_service()
        .get_pending(context("admin"), None)
        .await
        .unwrap();
    assert_eq!(1, pending.len());
    assert_eq!(maria.id, pending[0].id);

    let approved = rest_state
        .account_service()
        .approve(
            maria.id,
            &Approval {
                role: Role::Employee,
                is_approved: true,
                version: maria.version,
            },
            context("admin"),
            None,
        )
        .await
        .unwrap();
    assert!(approved.is_approved);
    assert_ne!(maria.version, approved.version);

    let dashboard = rest_state
        .dashboard_service()
        .dashboard(context("maria"), None)
        .await
        .unwrap();
    assert!(matches!(dashboard, Dashboard::Employee { .. }));
}

#[tokio::test]
async fn test_duplicate_registration() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    rest_state
        .account_service()
        .register(&registration("maria"), None)
        .await
        .unwrap();
    let result = rest_state
        .account_service()
        .register(&registration("maria"), None)
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn test_wrong_password() {
    let test_setup = TestSetup::new().await;
    test_setup.create_approved_user("maria", Role::Employee).await;
    let result = test_setup
        .rest_state
        .account_service()
        .authenticate("maria", "not-the-password", None)
        .await;
    assert!(matches!(result, Err(ServiceError::Unauthorized)));
}

#[tokio::test]
async fn test_stale_approval_conflicts() {
    let test_setup = TestSetup::new().await;
    test_setup.create_user("admin", Role::Staff).await;
    let maria = test_setup.create_approved_user("maria", Role::Employee).await;
    let result = test_setup
        .rest_state
        .account_service()
        .approve(
            maria.id,
            &Approval {
                role: Role::Accountant,
                is_approved: true,
                version: uuid::Uuid::nil(),
            },
            context("admin"),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::EntityConflicts(..))));
}

#[tokio::test]
async fn test_night_shift_and_overtime() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    let maria = test_setup.create_approved_user("maria", Role::Employee).await;
    test_setup
        .create_approved_user("contador", Role::Accountant)
        .await;

    let night_shift = rest_state
        .report_service()
        .create(
            &ReportSubmission {
                place_description: "Night watch".into(),
                start_date: date!(2024 - 02 - 29),
                start_hour: 20,
                end_date: date!(2024 - 03 - 01),
                end_hour: 0,
            },
            context("maria"),
            None,
        )
        .await
        .unwrap();
    assert_eq!(Decimal::from(4), night_shift.worked_hours());

    rest_state
        .report_service()
        .create(&submission(6, 12), context("maria"), None)
        .await
        .unwrap();
    rest_state
        .report_service()
        .create(&submission(13, 17), context("maria"), None)
        .await
        .unwrap();

    let summary = rest_state
        .daily_summary_service()
        .summarize(maria.id, date!(2024 - 03 - 01), context("contador"), None)
        .await
        .unwrap();
    assert_eq!(Decimal::from(10), summary.total_hours);
    assert_eq!(Decimal::from(8), summary.regular_hours);
    assert_eq!(Decimal::from(2), summary.overtime_hours);
    assert_eq!(2, summary.reports.len());

    let performance = rest_state
        .daily_summary_service()
        .performance(maria.id, context("contador"), None)
        .await
        .unwrap();
    assert_eq!(2, performance.len());
    assert_eq!(date!(2024 - 03 - 01), performance[0].date);
    assert_eq!(date!(2024 - 02 - 29), performance[1].date);
    assert_eq!(Decimal::from(4), performance[1].total_hours);

    let mine = rest_state
        .report_service()
        .get_for_current_user(context("maria"), None)
        .await
        .unwrap();
    assert_eq!(3, mine.len());
}

#[tokio::test]
async fn test_employee_cannot_see_other_reports() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    let maria = test_setup.create_approved_user("maria", Role::Employee).await;
    test_setup.create_approved_user("jose", Role::Employee).await;
    rest_state
        .report_service()
        .create(&submission(8, 16), context("maria"), None)
        .await
        .unwrap();

    let result = rest_state
        .report_service()
        .get_by_user(maria.id, context("jose"), None)
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let result = rest_state
        .report_service()
        .get_all(context("jose"), None)
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let own = rest_state
        .report_service()
        .get_by_user(maria.id, context("maria"), None)
        .await
        .unwrap();
    assert_eq!(1, own.len());
}

#[tokio::test]
async fn test_accountant_dashboard_lists_approved_employees() {
    let test_setup = TestSetup::new().await;
    let rest_state = &test_setup.rest_state;
    test_setup.create_approved_user("maria", Role::Employee).await;
    test_setup.create_user("jose", Role::Employee).await;
    test_setup
        .create_approved_user("contador", Role::Accountant)
        .await;

    let dashboard = rest_state
        .dashboard_service()
        .dashboard(context("contador"), None)
        .await
        .unwrap();
    let Dashboard::Accountant { employees, .. } = dashboard else {
        panic!("Expected the accountant dashboard");
    };
    assert_eq!(1, employees.len());
    assert_eq!("maria", employees[0].username.as_ref());

    let exists = rest_state
        .account_service()
        .exists_by_username("jose", Authentication::Full, None)
        .await
        .unwrap();
    assert!(exists);
}
