use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, put},
    Extension, Json, Router,
};
use rest_types::{ApprovalTO, UserTO};
use service::{account::AccountService, ServiceError};
use tracing::instrument;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::{error_handler, json_response, Context, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_users::<RestState>))
        .route("/pending", get(get_pending_users::<RestState>))
        .route("/employees", get(get_approved_employees::<RestState>))
        .route("/current", get(get_current_user::<RestState>))
        .route("/{id}", get(get_user::<RestState>))
        .route("/{id}/approval", put(approve_user::<RestState>))
}

fn to_user_tos(users: &[service::account::User]) -> Arc<[UserTO]> {
    users.iter().map(UserTO::from).collect()
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "",
    tags = ["Users"],
    responses(
        (status = 200, description = "All registered users", body = [UserTO]),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn get_all_users<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let users = rest_state
                .account_service()
                .get_all(context.into(), None)
                .await?;
            json_response(200, &to_user_tos(&users))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/pending",
    tags = ["Users"],
    responses(
        (status = 200, description = "Users waiting for approval", body = [UserTO]),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn get_pending_users<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let users = rest_state
                .account_service()
                .get_pending(context.into(), None)
                .await?;
            json_response(200, &to_user_tos(&users))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/employees",
    tags = ["Users"],
    responses(
        (status = 200, description = "Approved employees", body = [UserTO]),
        (status = 403, description = "Forbidden"),
    ),
)]
pub async fn get_approved_employees<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let users = rest_state
                .account_service()
                .get_approved_employees(context.into(), None)
                .await?;
            json_response(200, &to_user_tos(&users))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/current",
    tags = ["Users"],
    responses(
        (status = 200, description = "The logged in user", body = UserTO),
        (status = 401, description = "Not logged in"),
    ),
)]
pub async fn get_current_user<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
) -> Response {
    error_handler(
        (async {
            let user = rest_state
                .account_service()
                .current_account(context.into(), None)
                .await?
                .ok_or(ServiceError::Unauthorized)?;
            json_response(200, &UserTO::from(&user))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Users"],
    params(
        ("id", description = "User id"),
    ),
    responses(
        (status = 200, description = "User found", body = UserTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
    ),
)]
pub async fn get_user<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(user_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let user = rest_state
                .account_service()
                .get(user_id, context.into(), None)
                .await?;
            json_response(200, &UserTO::from(&user))
        })
        .await,
    )
}

#[instrument(skip(rest_state))]
#[utoipa::path(
    put,
    path = "/{id}/approval",
    tags = ["Users"],
    params(
        ("id", description = "User id"),
    ),
    request_body = ApprovalTO,
    responses(
        (status = 200, description = "Role and approval updated", body = UserTO),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 409, description = "The user was modified in the meantime"),
    ),
)]
pub async fn approve_user<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(context): Extension<Context>,
    Path(user_id): Path<Uuid>,
    Json(approval): Json<ApprovalTO>,
) -> Response {
    error_handler(
        (async {
            let user = rest_state
                .account_service()
                .approve(user_id, &(&approval).into(), context.into(), None)
                .await?;
            json_response(200, &UserTO::from(&user))
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_users,
        get_pending_users,
        get_approved_employees,
        get_current_user,
        get_user,
        approve_user,
    ),
    components(schemas(UserTO, ApprovalTO))
)]
pub struct UserApiDoc;
