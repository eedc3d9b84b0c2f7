use std::sync::Arc;

use mockall::automock;

use crate::ServiceError;

#[automock]
pub trait PasswordService {
    fn hash_password(&self, password: &str) -> Result<Arc<str>, ServiceError>;
    fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, ServiceError>;
}
