use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::account::User;
use crate::permission::Authentication;
use crate::report::Report;
use crate::ServiceError;

/// What the current user sees after logging in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dashboard {
    PendingApproval {
        user: User,
    },
    Staff {
        user: User,
        pending_users: Arc<[User]>,
        users: Arc<[User]>,
    },
    Accountant {
        user: User,
        reports: Arc<[Report]>,
        employees: Arc<[User]>,
    },
    Employee {
        user: User,
        recent_reports: Arc<[Report]>,
    },
}

impl Dashboard {
    pub fn user(&self) -> &User {
        match self {
            Dashboard::PendingApproval { user }
            | Dashboard::Staff { user, .. }
            | Dashboard::Accountant { user, .. }
            | Dashboard::Employee { user, .. } => user,
        }
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait DashboardService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn dashboard(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Dashboard, ServiceError>;
}
