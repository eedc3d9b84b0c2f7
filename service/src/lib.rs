use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

pub mod account;
pub mod clock;
pub mod config;
pub mod daily_summary;
pub mod dashboard;
pub mod password;
pub mod permission;
pub mod report;
pub mod session;
pub mod user_service;
pub mod uuid_service;

pub use permission::MockPermissionService;
pub use permission::PermissionService;
pub use permission::Privilege;
pub use permission::Role;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationFailureItem {
    InvalidValue(Arc<str>),
    Missing(Arc<str>),
    TooLong(Arc<str>, usize),
    Duplicate(Arc<str>),
    PasswordMismatch,
    EndNotAfterStart,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Entity {0} conflicts, expected version {1} but got {2}")]
    EntityConflicts(Uuid, Uuid, Uuid),

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("Password hash error: {0}")]
    PasswordHashError(Arc<str>),

    #[error("Internal error")]
    InternalError,
}
