use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Extension, Json, Router,
};
use rest_types::{CreateReportTO, DailySummaryTO, ReportTO};
use service::{daily_summary::DailySummaryService, report::ReportService};
use time::{macros::format_description, Date};
use tracing::instrument;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route(
            "/",
            get(get_all_reports::<RestState>).post(create_report::<RestState>),
        )
        .route("/mine", get(get_my_reports::<RestState>))
        .route("/{id}", get(get_report::<RestState>))
        .route(
            "/employee/{id}/performance",
            get(get_performance::<RestState>),
        )
        .route(
            "/employee/{id}/day/{date}",
            get(get_daily_summary::<RestState>),
        )
}

fn to_report_tos(reports: &[service::report::Report]) -> Arc<[ReportTO]> {
    reports.iter().map(ReportTO::from).collect()
}

fn parse_date(date: &str) -> Result<Date, RestError> {
    Date::parse(date, format_description!("[year]-[month]-[day]"))
        .map_err(|_| RestError::BadRequest(format!("Invalid date: {}", date).into()))
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Reports"],
    responses(
        (status = 200, description = "All reports, newest first", body = [ReportTO]),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn get_all_reports<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let reports = rest_state
                .report_service()
                .get_all(context.into(), None)
                .await?;
            json_response(200, &to_report_tos(&reports))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/mine",
    tags = ["Reports"],
    responses(
        (status = 200, description = "Reports of the logged in employee", body = [ReportTO]),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn get_my_reports<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let reports = rest_state
                .report_service()
                .get_for_current_user(context.into(), None)
                .await?;
            json_response(200, &to_report_tos(&reports))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    post,
    path = "",
    tags = ["Reports"],
    request_body = CreateReportTO,
    responses(
        (status = 201, description = "Report created", body = ReportTO),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Invalid report"),
    ),
)]
pub async fn create_report<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Json(report): Json<CreateReportTO>,
) -> Response {
    error_handler(
        (async {
            let report = rest_state
                .report_service()
                .create(&(&report).into(), context.into(), None)
                .await?;
            json_response(201, &ReportTO::from(&report))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Reports"],
    params(
        ("id", description = "Report id"),
    ),
    responses(
        (status = 200, description = "Report found", body = ReportTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Report not found"),
    ),
)]
pub async fn get_report<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(report_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let report = rest_state
                .report_service()
                .get(report_id, context.into(), None)
                .await?;
            json_response(200, &ReportTO::from(&report))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/employee/{id}/performance",
    tags = ["Reports"],
    params(
        ("id", description = "Id of the employee"),
    ),
    responses(
        (status = 200, description = "Daily summaries, newest day first", body = [DailySummaryTO]),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
    ),
)]
pub async fn get_performance<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(user_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let summaries: Arc<[DailySummaryTO]> = rest_state
                .daily_summary_service()
                .performance(user_id, context.into(), None)
                .await?
                .iter()
                .map(DailySummaryTO::from)
                .collect();
            json_response(200, &summaries)
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/employee/{id}/day/{date}",
    tags = ["Reports"],
    params(
        ("id", description = "Id of the employee"),
        ("date", description = "Day to summarize", example = "2024-01-31"),
    ),
    responses(
        (status = 200, description = "Hours of the day split into regular and overtime", body = DailySummaryTO),
        (status = 400, description = "Invalid date"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
    ),
)]
pub async fn get_daily_summary<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path((user_id, date)): Path<(Uuid, String)>,
) -> Response {
    error_handler(
        (async {
            let date = parse_date(&date)?;
            let summary = rest_state
                .daily_summary_service()
                .summarize(user_id, date, context.into(), None)
                .await?;
            json_response(200, &DailySummaryTO::from(&summary))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_reports,
        get_my_reports,
        create_report,
        get_report,
        get_performance,
        get_daily_summary,
    ),
    components(schemas(ReportTO, CreateReportTO, DailySummaryTO))
)]
pub struct ReportApiDoc;
