use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use service::{password::PasswordService, uuid_service::UuidService, ServiceError};

/// Argon2id hashing with a random salt taken from the uuid service.
pub struct PasswordServiceImpl<UuidService> {
    uuid_service: Arc<UuidService>,
}

impl<U: UuidService> PasswordServiceImpl<U> {
    pub fn new(uuid_service: Arc<U>) -> Self {
        Self { uuid_service }
    }
}

impl<U: UuidService + Send + Sync> PasswordService for PasswordServiceImpl<U> {
    fn hash_password(&self, password: &str) -> Result<Arc<str>, ServiceError> {
        let salt_source = self.uuid_service.new_uuid("password-salt");
        let salt = SaltString::encode_b64(salt_source.as_bytes())
            .map_err(|err| ServiceError::PasswordHashError(err.to_string().into()))?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| ServiceError::PasswordHashError(err.to_string().into()))?;
        Ok(hash.to_string().into())
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, ServiceError> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|err| ServiceError::PasswordHashError(err.to_string().into()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::uuid_service::MockUuidService;
    use uuid::uuid;

    fn build_service() -> PasswordServiceImpl<MockUuidService> {
        let mut uuid_service = MockUuidService::new();
        uuid_service
            .expect_new_uuid()
            .returning(|_| uuid!("5F1B5D0C-33B1-4C0E-9C38-0D4F1A6F6D11"));
        PasswordServiceImpl::new(Arc::new(uuid_service))
    }

    #[test]
    fn test_hash_and_verify() {
        let service = build_service();
        let hash = service.hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(service.verify_password("correct horse", &hash).unwrap());
        assert!(!service.verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        let service = build_service();
        assert!(matches!(
            service.verify_password("secret", "plain"),
            Err(ServiceError::PasswordHashError(_))
        ));
    }
}
