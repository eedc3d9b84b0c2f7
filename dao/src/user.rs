use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleEntity {
    Staff,
    Accountant,
    Employee,
}

impl RoleEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleEntity::Staff => "STAFF",
            RoleEntity::Accountant => "CONTADOR",
            RoleEntity::Employee => "EMPLEADO",
        }
    }
}

impl TryFrom<&str> for RoleEntity {
    type Error = DaoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "STAFF" => Ok(RoleEntity::Staff),
            "CONTADOR" => Ok(RoleEntity::Accountant),
            "EMPLEADO" => Ok(RoleEntity::Employee),
            _ => Err(DaoError::EnumValueNotFound(value.into())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: Arc<str>,
    pub email: Arc<str>,
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    pub phone: Arc<str>,
    pub password_hash: Arc<str>,
    pub role: RoleEntity,
    pub is_approved: bool,
    pub is_staff: bool,
    pub date_joined: time::PrimitiveDateTime,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait UserDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[UserEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<UserEntity>, DaoError>;
    async fn find_by_username(
        &self,
        username: &str,
        tx: Self::Transaction,
    ) -> Result<Option<UserEntity>, DaoError>;
    async fn find_by_email(
        &self,
        email: &str,
        tx: Self::Transaction,
    ) -> Result<Option<UserEntity>, DaoError>;
    async fn find_by_role(
        &self,
        role: RoleEntity,
        tx: Self::Transaction,
    ) -> Result<Arc<[UserEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &UserEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &UserEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
