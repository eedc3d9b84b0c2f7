use axum::{
    body::Body,
    extract::State,
    response::Response,
    routing::post,
    Extension, Json, Router,
};
use rest_types::{LoginTO, RegistrationTO, UserTO};
use service::{account::AccountService, session::SessionService};
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::instrument;
use utoipa::OpenApi;

use crate::{error_handler, json_response, RestStateDef, SESSION_COOKIE};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/register", post(register::<RestState>))
        .route("/login", post(login::<RestState>))
        .route("/logout", post(logout::<RestState>))
}

#[instrument(skip(rest_state, registration))]
#[utoipa::path(
    post,
    path = "/register",
    tags = ["Authentication"],
    request_body = RegistrationTO,
    responses(
        (status = 201, description = "Account created and waiting for approval", body = UserTO),
        (status = 422, description = "Invalid registration data"),
    ),
)]
pub async fn register<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(registration): Json<RegistrationTO>,
) -> Response {
    error_handler(
        (async {
            let user = rest_state
                .account_service()
                .register(&(&registration).into(), None)
                .await?;
            json_response(201, &UserTO::from(&user))
        })
        .await,
    )
}

#[instrument(skip(rest_state, cookies, login))]
#[utoipa::path(
    post,
    path = "/login",
    tags = ["Authentication"],
    request_body = LoginTO,
    responses(
        (status = 200, description = "Logged in, the session cookie is set", body = UserTO),
        (status = 401, description = "Invalid credentials"),
    ),
)]
pub async fn login<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(cookies): Extension<Cookies>,
    Json(login): Json<LoginTO>,
) -> Response {
    error_handler(
        (async {
            let user = rest_state
                .account_service()
                .authenticate(&login.username, &login.password, None)
                .await?;
            let session = rest_state
                .session_service()
                .new_session_for_user(&user.username)
                .await?;
            let cookie = Cookie::build((SESSION_COOKIE, session.id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict);
            cookies.add(cookie.into());
            tracing::info!("{} logged in", user.username);
            json_response(200, &UserTO::from(&user))
        })
        .await,
    )
}

#[instrument(skip(rest_state, cookies))]
#[utoipa::path(
    post,
    path = "/logout",
    tags = ["Authentication"],
    responses(
        (status = 204, description = "Session closed"),
    ),
)]
pub async fn logout<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Extension(cookies): Extension<Cookies>,
) -> Response {
    error_handler(
        (async {
            if let Some(cookie) = cookies.get(SESSION_COOKIE) {
                rest_state
                    .session_service()
                    .invalidate_user_session(cookie.value())
                    .await?;
            }
            cookies.remove(Cookie::build(SESSION_COOKIE).path("/").into());
            Ok(Response::builder().status(204).body(Body::empty())?)
        })
        .await,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(register, login, logout),
    components(schemas(RegistrationTO, LoginTO, UserTO))
)]
pub struct AuthApiDoc;
