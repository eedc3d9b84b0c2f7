use std::sync::Arc;

use async_trait::async_trait;
use service::{user_service::UserService, ServiceError};

/// Takes the username which the session middleware put into the context.
pub struct UserServiceImpl;

#[async_trait]
impl UserService for UserServiceImpl {
    type Context = Option<Arc<str>>;

    async fn current_user(&self, context: Self::Context) -> Result<Arc<str>, ServiceError> {
        context.ok_or(ServiceError::Unauthorized)
    }
}
