use axum::{extract::State, response::Response, routing::get, Extension, Router};
use rest_types::DashboardTO;
use service::dashboard::DashboardService;
use tracing::instrument;
use utoipa::OpenApi;

use crate::{error_handler, json_response, Context, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new().route("/", get(get_dashboard::<RestState>))
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Dashboard"],
    responses(
        (status = 200, description = "Dashboard for the role of the logged in user", body = DashboardTO),
        (status = 401, description = "Not logged in"),
    ),
)]
pub async fn get_dashboard<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let dashboard = rest_state
                .dashboard_service()
                .dashboard(context.into(), None)
                .await?;
            json_response(200, &DashboardTO::from(&dashboard))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(paths(get_dashboard), components(schemas(DashboardTO)))]
pub struct DashboardApiDoc;
