use std::sync::Arc;

use async_trait::async_trait;
use dao::{user::UserDao, TransactionDao};
use service::permission::{Authentication, Privilege, Role};
use service::user_service::UserService;
use service::{PermissionService, ServiceError};

use crate::gen_service_impl;

gen_service_impl! {
    struct PermissionServiceImpl: PermissionService = PermissionServiceDeps {
        UserDao: UserDao<Transaction = Self::Transaction> = user_dao,
        UserService: UserService<Context = Self::Context> = user_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao
    }
}

#[async_trait]
impl<Deps: PermissionServiceDeps> PermissionService for PermissionServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn current_user_id(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Arc<str>>, ServiceError> {
        match context {
            Authentication::Full => Ok(None),
            Authentication::Context(context) => {
                let current_user = self.user_service.current_user(context).await?;
                Ok(Some(current_user))
            }
        }
    }

    async fn check_permission(
        &self,
        privilege: Privilege,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let context = match context {
            Authentication::Full => return Ok(()),
            Authentication::Context(context) => context,
        };
        let current_user = self.user_service.current_user(context).await?;
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let user = self
            .user_dao
            .find_by_username(current_user.as_ref(), tx.clone())
            .await?
            .ok_or(ServiceError::Unauthorized)?;
        self.transaction_dao.commit(tx).await?;

        let role = Role::from(user.role);
        if !user.is_approved && !role.forces_approval() {
            tracing::info!("Unapproved user {} was denied {:?}", user.username, privilege);
            return Err(ServiceError::Forbidden);
        }
        if role.grants(privilege) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }

    async fn check_user(
        &self,
        user: &str,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        match context {
            Authentication::Full => Ok(()),
            Authentication::Context(context) => {
                let current_user = self.user_service.current_user(context).await?;
                if current_user.as_ref() == user {
                    Ok(())
                } else {
                    Err(ServiceError::Forbidden)
                }
            }
        }
    }

    async fn check_only_full_authentication(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        match context {
            Authentication::Full => Ok(()),
            Authentication::Context(_) => Err(ServiceError::Forbidden),
        }
    }
}
