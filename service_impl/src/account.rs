use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    user::{RoleEntity, UserDao, UserEntity},
    TransactionDao,
};
use service::{
    account::{apply_role_invariants, AccountService, Approval, Registration, User},
    clock::ClockService,
    password::PasswordService,
    permission::{Authentication, Privilege, Role},
    uuid_service::UuidService,
    PermissionService, ServiceError, ValidationFailureItem,
};
use tokio::join;
use uuid::Uuid;

use crate::gen_service_impl;

const ACCOUNT_SERVICE_PROCESS: &str = "account-service";

const MAX_NAME_LENGTH: usize = 150;
const MAX_PHONE_LENGTH: usize = 20;
const MIN_PASSWORD_LENGTH: usize = 8;

gen_service_impl! {
    struct AccountServiceImpl: AccountService = AccountServiceDeps {
        UserDao: UserDao<Transaction = Self::Transaction> = user_dao,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        PasswordService: PasswordService = password_service,
        UuidService: UuidService = uuid_service,
        ClockService: ClockService = clock_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao
    }
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

fn check_length(
    failures: &mut Vec<ValidationFailureItem>,
    field: &str,
    value: &str,
    required: bool,
    max_length: usize,
) {
    if required && value.trim().is_empty() {
        failures.push(ValidationFailureItem::Missing(field.into()));
    } else if value.chars().count() > max_length {
        failures.push(ValidationFailureItem::TooLong(field.into(), max_length));
    }
}

/// Checks the fields of a registration which need no database lookup.
pub fn validate_registration(registration: &Registration) -> Vec<ValidationFailureItem> {
    let mut failures = Vec::new();

    check_length(
        &mut failures,
        "username",
        &registration.username,
        true,
        MAX_NAME_LENGTH,
    );
    if !registration.username.chars().all(is_username_char) {
        failures.push(ValidationFailureItem::InvalidValue("username".into()));
    }

    let email = registration.email.trim();
    if email.is_empty() {
        failures.push(ValidationFailureItem::Missing("email".into()));
    } else if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        failures.push(ValidationFailureItem::InvalidValue("email".into()));
    }

    check_length(
        &mut failures,
        "first_name",
        &registration.first_name,
        true,
        MAX_NAME_LENGTH,
    );
    check_length(
        &mut failures,
        "last_name",
        &registration.last_name,
        true,
        MAX_NAME_LENGTH,
    );
    check_length(
        &mut failures,
        "phone",
        &registration.phone,
        false,
        MAX_PHONE_LENGTH,
    );

    if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
        failures.push(ValidationFailureItem::InvalidValue("password".into()));
    }
    if registration.password != registration.password_confirmation {
        failures.push(ValidationFailureItem::PasswordMismatch);
    }

    failures
}

impl<Deps: AccountServiceDeps> AccountServiceImpl<Deps> {
    async fn create_account(
        &self,
        registration: &Registration,
        role: Role,
        tx: Deps::Transaction,
    ) -> Result<User, ServiceError> {
        let mut failures = validate_registration(registration);
        if self
            .user_dao
            .find_by_username(&registration.username, tx.clone())
            .await?
            .is_some()
        {
            failures.push(ValidationFailureItem::Duplicate("username".into()));
        }
        if self
            .user_dao
            .find_by_email(registration.email.trim(), tx.clone())
            .await?
            .is_some()
        {
            failures.push(ValidationFailureItem::Duplicate("email".into()));
        }
        if !failures.is_empty() {
            return Err(ServiceError::ValidationError(failures.into()));
        }

        let password_hash = self
            .password_service
            .hash_password(&registration.password)?;
        let entity = apply_role_invariants(UserEntity {
            id: self.uuid_service.new_uuid("create-id"),
            username: registration.username.clone(),
            email: registration.email.trim().into(),
            first_name: registration.first_name.trim().into(),
            last_name: registration.last_name.trim().into(),
            phone: registration.phone.trim().into(),
            password_hash,
            role: role.into(),
            is_approved: false,
            is_staff: false,
            date_joined: self.clock_service.date_time_now(),
            version: self.uuid_service.new_uuid("create-version"),
        });
        self.user_dao
            .create(&entity, ACCOUNT_SERVICE_PROCESS, tx)
            .await?;
        tracing::info!("Created {:?} account {}", role, entity.username);
        Ok(User::from(&entity))
    }
}

#[async_trait]
impl<Deps: AccountServiceDeps> AccountService for AccountServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn register(
        &self,
        registration: &Registration,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let user = self
            .create_account(registration, Role::Employee, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(user)
    }

    async fn create_with_role(
        &self,
        registration: &Registration,
        role: Role,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError> {
        self.permission_service
            .check_only_full_authentication(context)
            .await?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let user = self.create_account(registration, role, tx.clone()).await?;
        self.transaction_dao.commit(tx).await?;
        Ok(user)
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let Some(entity) = self.user_dao.find_by_username(username, tx.clone()).await? else {
            tracing::info!("Login attempt for unknown user {}", username);
            return Err(ServiceError::Unauthorized);
        };
        if !self
            .password_service
            .verify_password(password, &entity.password_hash)?
        {
            tracing::info!("Login attempt with wrong password for {}", username);
            return Err(ServiceError::Unauthorized);
        }
        self.transaction_dao.commit(tx).await?;
        Ok(User::from(&entity))
    }

    async fn current_account(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<User>, ServiceError> {
        let Some(username) = self.permission_service.current_user_id(context).await? else {
            return Ok(None);
        };
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let user = self
            .user_dao
            .find_by_username(&username, tx.clone())
            .await?
            .as_ref()
            .map(User::from);
        self.transaction_dao.commit(tx).await?;
        Ok(user)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let entity = self
            .user_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        let (staff_permission, self_permission) = join!(
            self.permission_service.check_permission(
                Privilege::ManageUsers,
                context.clone(),
                tx.clone().into()
            ),
            self.permission_service
                .check_user(&entity.username, context.clone()),
        );
        staff_permission.or(self_permission)?;
        self.transaction_dao.commit(tx).await?;
        Ok(User::from(&entity))
    }

    async fn exists_by_username(
        &self,
        username: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<bool, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::ManageUsers, context, tx.clone().into())
            .await?;
        let exists = self
            .user_dao
            .find_by_username(username, tx.clone())
            .await?
            .is_some();
        self.transaction_dao.commit(tx).await?;
        Ok(exists)
    }

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[User]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::ManageUsers, context, tx.clone().into())
            .await?;
        let users = self
            .user_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(User::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(users)
    }

    async fn get_pending(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[User]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::ManageUsers, context, tx.clone().into())
            .await?;
        let users = self
            .user_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(User::from)
            .filter(User::is_pending)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(users)
    }

    async fn get_approved_employees(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[User]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::ListEmployees, context, tx.clone().into())
            .await?;
        let users = self
            .user_dao
            .find_by_role(RoleEntity::Employee, tx.clone())
            .await?
            .iter()
            .filter(|entity| entity.is_approved)
            .map(User::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(users)
    }

    async fn approve(
        &self,
        id: Uuid,
        approval: &Approval,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<User, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::ManageUsers, context, tx.clone().into())
            .await?;

        let mut entity = self
            .user_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        if entity.version != approval.version {
            return Err(ServiceError::EntityConflicts(
                id,
                approval.version,
                entity.version,
            ));
        }
        entity.role = approval.role.into();
        entity.is_approved = approval.is_approved;
        entity.version = self.uuid_service.new_uuid("update-version");
        let entity = apply_role_invariants(entity);

        self.user_dao
            .update(&entity, ACCOUNT_SERVICE_PROCESS, tx.clone())
            .await?;
        tracing::info!(
            "Account {} is now {:?}, approved: {}",
            entity.username,
            approval.role,
            entity.is_approved
        );

        self.transaction_dao.commit(tx).await?;
        Ok(User::from(&entity))
    }

    async fn verify_user(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let Some(username) = self.permission_service.current_user_id(context).await? else {
            return Ok(());
        };
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let user = self
            .user_dao
            .find_by_id(user_id, tx.clone())
            .await?
            .as_ref()
            .map(User::from);
        self.transaction_dao.commit(tx).await?;
        match user {
            Some(user) if user.username == username && !user.is_pending() => Ok(()),
            _ => Err(ServiceError::Forbidden),
        }
    }
}
