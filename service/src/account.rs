use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::user::UserEntity;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::permission::{Authentication, Role};
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: Arc<str>,
    pub email: Arc<str>,
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    pub phone: Arc<str>,
    pub role: Role,
    pub is_approved: bool,
    pub is_staff: bool,
    pub date_joined: Option<PrimitiveDateTime>,
    pub version: Uuid,
}
impl From<&UserEntity> for User {
    fn from(user: &UserEntity) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            role: user.role.into(),
            is_approved: user.is_approved,
            is_staff: user.is_staff,
            date_joined: Some(user.date_joined),
            version: user.version,
        }
    }
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Unapproved non-staff users may only see the pending approval page.
    pub fn is_pending(&self) -> bool {
        !self.is_approved && !self.role.forces_approval()
    }
}

/// Applies the role invariants to a user entity before it is written.
///
/// A staff user is always approved and always has the staff flag.
pub fn apply_role_invariants(mut entity: UserEntity) -> UserEntity {
    if Role::from(entity.role).forces_approval() {
        entity.is_approved = true;
        entity.is_staff = true;
    }
    entity
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub username: Arc<str>,
    pub email: Arc<str>,
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    pub phone: Arc<str>,
    pub password: Arc<str>,
    pub password_confirmation: Arc<str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Approval {
    pub role: Role,
    pub is_approved: bool,
    pub version: Uuid,
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait AccountService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Creates an unapproved employee account.
    async fn register(
        &self,
        registration: &Registration,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError>;

    /// Creates an account with the given role. Only for full authentication.
    async fn create_with_role(
        &self,
        registration: &Registration,
        role: Role,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError>;

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError>;

    async fn current_account(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<User>, ServiceError>;

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError>;

    async fn exists_by_username(
        &self,
        username: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<bool, ServiceError>;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[User]>, ServiceError>;

    async fn get_pending(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[User]>, ServiceError>;

    async fn get_approved_employees(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[User]>, ServiceError>;

    async fn approve(
        &self,
        id: Uuid,
        approval: &Approval,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError>;

    /// Succeeds if the current user is the given, approved user.
    async fn verify_user(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
