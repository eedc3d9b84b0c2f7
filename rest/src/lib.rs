use std::sync::Arc;

mod auth;
mod dashboard;
mod report;
mod session;
mod user;

use axum::{
    body::Body,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_cookies::CookieManagerLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use session::Context;
pub use session::SESSION_COOKIE;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] service::ServiceError),

    #[error("Bad request: {0}")]
    BadRequest(Arc<str>),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Could not build response: {0}")]
    ResponseError(#[from] axum::http::Error),

    #[error("Server error: {0}")]
    IoError(#[from] std::io::Error),
}

fn plain(status: StatusCode, body: impl Into<Body>) -> Response {
    (status, body.into()).into_response()
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    use service::ServiceError;
    match result {
        Ok(response) => response,
        Err(err @ RestError::BadRequest(_)) => plain(StatusCode::BAD_REQUEST, err.to_string()),
        Err(RestError::ServiceError(ServiceError::Unauthorized)) => {
            plain(StatusCode::UNAUTHORIZED, Body::empty())
        }
        Err(RestError::ServiceError(ServiceError::Forbidden)) => {
            plain(StatusCode::FORBIDDEN, Body::empty())
        }
        Err(RestError::ServiceError(ServiceError::EntityNotFound(id))) => {
            plain(StatusCode::NOT_FOUND, id.to_string())
        }
        Err(RestError::ServiceError(err @ ServiceError::EntityConflicts(_, _, _))) => {
            plain(StatusCode::CONFLICT, err.to_string())
        }
        Err(RestError::ServiceError(err @ ServiceError::ValidationError(_))) => {
            plain(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        Err(RestError::ServiceError(ServiceError::DatabaseQueryError(e))) => {
            tracing::error!("Database error: {}", e);
            plain(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(RestError::ServiceError(
            err @ (ServiceError::PasswordHashError(_) | ServiceError::InternalError),
        )) => {
            tracing::error!("Internal error: {}", err);
            plain(StatusCode::INTERNAL_SERVER_ERROR, Body::empty())
        }
        Err(
            err @ (RestError::SerializationError(_)
            | RestError::ResponseError(_)
            | RestError::IoError(_)),
        ) => {
            tracing::error!("Rest error: {}", err);
            plain(StatusCode::INTERNAL_SERVER_ERROR, Body::empty())
        }
    }
}

fn json_response<T: Serialize + ?Sized>(status: u16, value: &T) -> Result<Response, RestError> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::new(serde_json::to_string(value)?))?)
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type UserService: service::user_service::UserService<Context = Context> + Send + Sync + 'static;
    type SessionService: service::session::SessionService<Context = Context>
        + Send
        + Sync
        + 'static;
    type PermissionService: service::PermissionService<Context = Context> + Send + Sync + 'static;
    type AccountService: service::account::AccountService<Context = Context>
        + Send
        + Sync
        + 'static;
    type ReportService: service::report::ReportService<Context = Context> + Send + Sync + 'static;
    type DailySummaryService: service::daily_summary::DailySummaryService<Context = Context>
        + Send
        + Sync
        + 'static;
    type DashboardService: service::dashboard::DashboardService<Context = Context>
        + Send
        + Sync
        + 'static;

    fn backend_version(&self) -> Arc<str>;

    fn user_service(&self) -> Arc<Self::UserService>;
    fn session_service(&self) -> Arc<Self::SessionService>;
    fn permission_service(&self) -> Arc<Self::PermissionService>;
    fn account_service(&self) -> Arc<Self::AccountService>;
    fn report_service(&self) -> Arc<Self::ReportService>;
    fn daily_summary_service(&self) -> Arc<Self::DailySummaryService>;
    fn dashboard_service(&self) -> Arc<Self::DashboardService>;
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Timesheet backend"),
    nest(
        (path = "/auth", api = auth::AuthApiDoc),
        (path = "/dashboard", api = dashboard::DashboardApiDoc),
        (path = "/user", api = user::UserApiDoc),
        (path = "/report", api = report::ReportApiDoc),
    ),
)]
pub struct ApiDoc;

/// The complete application router including session handling.
pub fn build_router<RestState: RestStateDef>(rest_state: RestState) -> Router {
    Router::new()
        .nest("/auth", auth::generate_route())
        .nest("/dashboard", dashboard::generate_route())
        .nest("/user", user::generate_route())
        .nest("/report", report::generate_route())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(
            rest_state.clone(),
            session::context_extractor::<RestState>,
        ))
        .layer(CookieManagerLayer::new())
        .with_state(rest_state)
}

pub async fn start_server<RestState: RestStateDef>(
    rest_state: RestState,
    address: &str,
) -> Result<(), RestError> {
    tracing::info!(
        "Starting timesheet backend {} on {}",
        rest_state.backend_version(),
        address
    );
    let app = build_router(rest_state);
    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
