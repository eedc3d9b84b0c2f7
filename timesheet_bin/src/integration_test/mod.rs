use std::sync::Arc;

use rest::RestStateDef;
use service::{
    account::{Approval, AccountService, Registration, User},
    permission::Authentication,
    Role,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::RestStateImpl;

mod account_flow;
mod rest_api;

pub const PASSWORD: &str = "s3cret-password";

pub struct TestSetup {
    pub _pool: Arc<SqlitePool>,
    pub rest_state: RestStateImpl,
}

impl TestSetup {
    pub async fn new() -> Self {
        // Every connection to :memory: is a new database, so keep exactly one.
        let pool = Arc::new(
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
                .unwrap(),
        );
        sqlx::migrate!("../migrations/sqlite")
            .run(pool.as_ref())
            .await
            .unwrap();
        let rest_state = RestStateImpl::new(pool.clone());
        Self {
            _pool: pool,
            rest_state,
        }
    }

    pub async fn create_user(&self, username: &str, role: Role) -> User {
        self.rest_state
            .account_service()
            .create_with_role(&registration(username), role, Authentication::Full, None)
            .await
            .unwrap()
    }

    /// Creates the user and approves it right away.
    pub async fn create_approved_user(&self, username: &str, role: Role) -> User {
        let user = self.create_user(username, role).await;
        self.rest_state
            .account_service()
            .approve(
                user.id,
                &Approval {
                    role,
                    is_approved: true,
                    version: user.version,
                },
                Authentication::Full,
                None,
            )
            .await
            .unwrap()
    }
}

pub fn registration(username: &str) -> Registration {
    Registration {
        username: username.into(),
        email: format!("{}@example.com", username).into(),
        first_name: "Test".into(),
        last_name: username.into(),
        phone: "".into(),
        password: PASSWORD.into(),
        password_confirmation: PASSWORD.into(),
    }
}

pub fn context(username: &str) -> Authentication<Option<Arc<str>>> {
    Some(Arc::<str>::from(username)).into()
}
