use std::sync::Arc;

use crate::{format_date_time, parse_date_time, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    user::{RoleEntity, UserDao, UserEntity},
    DaoError,
};
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, phone, password_hash, role, is_approved, is_staff, date_joined, update_version";

pub struct UserDaoImpl {
    pub _pool: Arc<SqlitePool>,
}
impl UserDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserDb {
    id: Vec<u8>,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    phone: String,
    password_hash: String,
    role: String,
    is_approved: bool,
    is_staff: bool,
    date_joined: String,
    update_version: Vec<u8>,
}
impl TryFrom<&UserDb> for UserEntity {
    type Error = DaoError;
    fn try_from(user: &UserDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(user.id.as_ref())?,
            username: user.username.as_str().into(),
            email: user.email.as_str().into(),
            first_name: user.first_name.as_str().into(),
            last_name: user.last_name.as_str().into(),
            phone: user.phone.as_str().into(),
            password_hash: user.password_hash.as_str().into(),
            role: RoleEntity::try_from(user.role.as_str())?,
            is_approved: user.is_approved,
            is_staff: user.is_staff,
            date_joined: parse_date_time(&user.date_joined)?,
            version: Uuid::from_slice(&user.update_version)?,
        })
    }
}

fn collect_users(rows: Vec<UserDb>) -> Result<Arc<[UserEntity]>, DaoError> {
    rows.iter()
        .map(UserEntity::try_from)
        .collect::<Result<Arc<[UserEntity]>, DaoError>>()
}

#[async_trait]
impl UserDao for UserDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[UserEntity]>, DaoError> {
        let rows = query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account ORDER BY date_joined DESC"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        collect_users(rows)
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<UserEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account WHERE id = ?"
        ))
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(UserEntity::try_from)
        .transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
        tx: Self::Transaction,
    ) -> Result<Option<UserEntity>, DaoError> {
        query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(UserEntity::try_from)
        .transpose()
    }

    async fn find_by_email(
        &self,
        email: &str,
        tx: Self::Transaction,
    ) -> Result<Option<UserEntity>, DaoError> {
        query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account WHERE email = ? COLLATE NOCASE"
        ))
        .bind(email)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(UserEntity::try_from)
        .transpose()
    }

    async fn find_by_role(
        &self,
        role: RoleEntity,
        tx: Self::Transaction,
    ) -> Result<Arc<[UserEntity]>, DaoError> {
        let rows = query_as::<_, UserDb>(&format!(
            "SELECT {USER_COLUMNS} FROM user_account WHERE role = ? ORDER BY date_joined DESC"
        ))
        .bind(role.as_str())
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        collect_users(rows)
    }

    async fn create(
        &self,
        entity: &UserEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let id = entity.id.as_bytes().to_vec();
        let version = entity.version.as_bytes().to_vec();
        let date_joined = format_date_time(entity.date_joined)?;
        query("INSERT INTO user_account (id, username, email, first_name, last_name, phone, password_hash, role, is_approved, is_staff, date_joined, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(entity.username.as_ref())
            .bind(entity.email.as_ref())
            .bind(entity.first_name.as_ref())
            .bind(entity.last_name.as_ref())
            .bind(entity.phone.as_ref())
            .bind(entity.password_hash.as_ref())
            .bind(entity.role.as_str())
            .bind(entity.is_approved)
            .bind(entity.is_staff)
            .bind(date_joined)
            .bind(version)
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &UserEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let id = entity.id.as_bytes().to_vec();
        let version = entity.version.as_bytes().to_vec();
        query("UPDATE user_account SET email = ?, first_name = ?, last_name = ?, phone = ?, password_hash = ?, role = ?, is_approved = ?, is_staff = ?, update_version = ?, update_process = ? WHERE id = ?")
            .bind(entity.email.as_ref())
            .bind(entity.first_name.as_ref())
            .bind(entity.last_name.as_ref())
            .bind(entity.phone.as_ref())
            .bind(entity.password_hash.as_ref())
            .bind(entity.role.as_str())
            .bind(entity.is_approved)
            .bind(entity.is_staff)
            .bind(version)
            .bind(process)
            .bind(id)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
