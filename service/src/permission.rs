use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::user::RoleEntity;
use mockall::automock;

use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Staff,
    Accountant,
    Employee,
}
impl From<RoleEntity> for Role {
    fn from(role: RoleEntity) -> Self {
        match role {
            RoleEntity::Staff => Self::Staff,
            RoleEntity::Accountant => Self::Accountant,
            RoleEntity::Employee => Self::Employee,
        }
    }
}
impl From<Role> for RoleEntity {
    fn from(role: Role) -> Self {
        match role {
            Role::Staff => Self::Staff,
            Role::Accountant => Self::Accountant,
            Role::Employee => Self::Employee,
        }
    }
}

/// Things a role may be allowed to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// List users, approve them and assign roles.
    ManageUsers,
    /// See every report and the daily performance of every employee.
    ReviewReports,
    /// List the approved employees.
    ListEmployees,
    /// Submit reports for oneself and list them.
    SubmitReports,
}

impl Role {
    pub fn grants(&self, privilege: Privilege) -> bool {
        match self {
            Role::Staff => match privilege {
                Privilege::ManageUsers => true,
                Privilege::ReviewReports => true,
                Privilege::ListEmployees => true,
                Privilege::SubmitReports => false,
            },
            Role::Accountant => match privilege {
                Privilege::ManageUsers => false,
                Privilege::ReviewReports => true,
                Privilege::ListEmployees => true,
                Privilege::SubmitReports => false,
            },
            Role::Employee => match privilege {
                Privilege::ManageUsers => false,
                Privilege::ReviewReports => false,
                Privilege::ListEmployees => false,
                Privilege::SubmitReports => true,
            },
        }
    }

    /// Staff accounts are always approved and always elevated.
    pub fn forces_approval(&self) -> bool {
        match self {
            Role::Staff => true,
            Role::Accountant | Role::Employee => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication<Context: Clone + PartialEq + Eq + Send + Sync + Debug + 'static> {
    Full,
    Context(Context),
}
impl<Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static> From<Context>
    for Authentication<Context>
{
    fn from(context: Context) -> Self {
        Self::Context(context)
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait PermissionService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Username of the authenticated user, `None` for full authentication.
    async fn current_user_id(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Arc<str>>, ServiceError>;

    /// Succeeds if the current user is approved and its role grants the
    /// privilege.
    async fn check_permission(
        &self,
        privilege: Privilege,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;

    async fn check_user(
        &self,
        user: &str,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;

    async fn check_only_full_authentication(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_privileges() {
        assert!(Role::Staff.grants(Privilege::ManageUsers));
        assert!(Role::Staff.grants(Privilege::ReviewReports));
        assert!(Role::Staff.grants(Privilege::ListEmployees));
        assert!(!Role::Staff.grants(Privilege::SubmitReports));
    }

    #[test]
    fn test_accountant_privileges() {
        assert!(!Role::Accountant.grants(Privilege::ManageUsers));
        assert!(Role::Accountant.grants(Privilege::ReviewReports));
        assert!(Role::Accountant.grants(Privilege::ListEmployees));
        assert!(!Role::Accountant.grants(Privilege::SubmitReports));
    }

    #[test]
    fn test_employee_privileges() {
        assert!(!Role::Employee.grants(Privilege::ManageUsers));
        assert!(!Role::Employee.grants(Privilege::ReviewReports));
        assert!(!Role::Employee.grants(Privilege::ListEmployees));
        assert!(Role::Employee.grants(Privilege::SubmitReports));
    }

    #[test]
    fn test_only_staff_forces_approval() {
        assert!(Role::Staff.forces_approval());
        assert!(!Role::Accountant.forces_approval());
        assert!(!Role::Employee.forces_approval());
    }
}
