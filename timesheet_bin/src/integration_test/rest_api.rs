use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use rest_types::{DashboardTO, ReportTO, RoleTO, UserTO};
use service::Role;
use tower::ServiceExt;

use crate::integration_test::{TestSetup, PASSWORD};

fn router(test_setup: &TestSetup) -> Router {
    rest::build_router(test_setup.rest_state.clone())
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Logs in and returns the `name=value` part of the session cookie.
async fn login(test_setup: &TestSetup, username: &str) -> String {
    let response = router(test_setup)
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({ "username": username, "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_register_and_login() {
    let test_setup = TestSetup::new().await;
    let response = router(&test_setup)
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            serde_json::json!({
                "username": "maria",
                "email": "maria@example.com",
                "first_name": "Maria",
                "last_name": "Lopez",
                "password": PASSWORD,
                "password_confirmation": PASSWORD,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::CREATED, response.status());
    let user: UserTO = body_json(response).await;
    assert_eq!(RoleTO::Employee, user.role);
    assert!(!user.is_approved);

    let cookie = login(&test_setup, "maria").await;
    let response = router(&test_setup)
        .oneshot(get_request("/dashboard", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let dashboard: DashboardTO = body_json(response).await;
    assert!(matches!(dashboard, DashboardTO::PendingApproval { .. }));
}

#[tokio::test]
async fn test_invalid_registration() {
    let test_setup = TestSetup::new().await;
    let response = router(&test_setup)
        .oneshot(json_request(
            "POST",
            "/auth/register",
            None,
            serde_json::json!({
                "username": "maria",
                "email": "no-at-sign",
                "first_name": "Maria",
                "last_name": "Lopez",
                "password": PASSWORD,
                "password_confirmation": "something-else",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, response.status());
}

#[tokio::test]
async fn test_unauthenticated_requests() {
    let test_setup = TestSetup::new().await;
    let response = router(&test_setup)
        .oneshot(get_request("/dashboard", None))
        .await
        .unwrap();
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());

    let response = router(&test_setup)
        .oneshot(get_request("/dashboard", Some("app_session=unknown")))
        .await
        .unwrap();
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());

    let response = router(&test_setup)
        .oneshot(json_request(
            "POST",
            "/auth/login",
            None,
            serde_json::json!({ "username": "nobody", "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
}

#[tokio::test]
async fn test_submit_report() {
    let test_setup = TestSetup::new().await;
    test_setup.create_approved_user("maria", Role::Employee).await;
    let cookie = login(&test_setup, "maria").await;

    let response = router(&test_setup)
        .oneshot(json_request(
            "POST",
            "/report",
            Some(&cookie),
            serde_json::json!({
                "place_description": "Night watch",
                "start_date": "2024-01-01",
                "start_hour": 22,
                "end_date": "2024-01-02",
                "end_hour": 6,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::CREATED, response.status());
    let report: ReportTO = body_json(response).await;
    assert_eq!(rust_decimal::Decimal::from(8), report.worked_hours);

    let response = router(&test_setup)
        .oneshot(json_request(
            "POST",
            "/report",
            Some(&cookie),
            serde_json::json!({
                "place_description": "Backwards",
                "start_date": "2024-01-02",
                "start_hour": 10,
                "end_date": "2024-01-02",
                "end_hour": 9,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, response.status());

    let response = router(&test_setup)
        .oneshot(get_request("/report/mine", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let reports: Vec<ReportTO> = body_json(response).await;
    assert_eq!(1, reports.len());

    let response = router(&test_setup)
        .oneshot(get_request("/report", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(StatusCode::FORBIDDEN, response.status());
}

#[tokio::test]
async fn test_daily_summary_with_invalid_date() {
    let test_setup = TestSetup::new().await;
    let maria = test_setup.create_approved_user("maria", Role::Employee).await;
    let cookie = login(&test_setup, "maria").await;
    let response = router(&test_setup)
        .oneshot(get_request(
            &format!("/report/employee/{}/day/2024-13-01", maria.id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, response.status());

    let response = router(&test_setup)
        .oneshot(get_request(
            &format!("/report/employee/{}/day/2024-01-01", maria.id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
}

#[tokio::test]
async fn test_daily_summary_for_unknown_user() {
    let test_setup = TestSetup::new().await;
    test_setup
        .create_approved_user("contador", Role::Accountant)
        .await;
    let cookie = login(&test_setup, "contador").await;
    let response = router(&test_setup)
        .oneshot(get_request(
            &format!("/report/employee/{}/day/2024-01-01", uuid::Uuid::new_v4()),
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::NOT_FOUND, response.status());
}

#[tokio::test]
async fn test_logout_ends_session() {
    let test_setup = TestSetup::new().await;
    test_setup.create_approved_user("maria", Role::Employee).await;
    let cookie = login(&test_setup, "maria").await;

    let response = router(&test_setup)
        .oneshot(json_request("POST", "/auth/logout", Some(&cookie), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(StatusCode::NO_CONTENT, response.status());

    let response = router(&test_setup)
        .oneshot(get_request("/user/current", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
}

#[tokio::test]
async fn test_staff_approves_user() {
    let test_setup = TestSetup::new().await;
    test_setup.create_user("admin", Role::Staff).await;
    let jose = test_setup.create_user("jose", Role::Employee).await;
    let cookie = login(&test_setup, "admin").await;

    let response = router(&test_setup)
        .oneshot(get_request("/user/pending", Some(&cookie)))
        .await
        .unwrap();
    let pending: Vec<UserTO> = body_json(response).await;
    assert_eq!(1, pending.len());

    let response = router(&test_setup)
        .oneshot(json_request(
            "PUT",
            &format!("/user/{}/approval", jose.id),
            Some(&cookie),
            serde_json::json!({ "role": "CONTADOR", "is_approved": true, "$version": jose.version }),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let approved: UserTO = body_json(response).await;
    assert_eq!(RoleTO::Accountant, approved.role);

    let response = router(&test_setup)
        .oneshot(json_request(
            "PUT",
            &format!("/user/{}/approval", jose.id),
            Some(&cookie),
            serde_json::json!({ "role": "EMPLEADO", "is_approved": true, "$version": jose.version }),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::CONFLICT, response.status());
}
