use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use service::session::SessionService;
use tower_cookies::Cookies;

use crate::RestStateDef;

/// The username of the logged in user, if any.
pub type Context = Option<Arc<str>>;

pub const SESSION_COOKIE: &str = "app_session";

pub async fn context_extractor<RestState: RestStateDef>(
    State(rest_state): State<RestState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session_id = request
        .extensions()
        .get::<Cookies>()
        .and_then(|cookies| cookies.get(SESSION_COOKIE))
        .map(|cookie| cookie.value().to_string());

    let context: Context = match session_id {
        Some(session_id) => match rest_state
            .session_service()
            .verify_user_session(&session_id)
            .await
        {
            Ok(session) => session.map(|session| session.user_id),
            Err(err) => {
                tracing::error!("Could not verify session: {}", err);
                None
            }
        },
        None => None,
    };
    request.extensions_mut().insert(context);
    next.run(request).await
}
