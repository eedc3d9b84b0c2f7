#[cfg(test)]
mod integration_test;

use std::{env, str::FromStr, sync::Arc};

use dao_impl_sqlite::{
    report::ReportDaoImpl, session::SessionDaoImpl, user::UserDaoImpl, TransactionDaoImpl,
    TransactionImpl,
};
use service::{
    account::{AccountService, Registration},
    permission::Authentication,
    Role, ServiceError,
};
use service_impl::{
    account::{AccountServiceDeps, AccountServiceImpl},
    daily_summary::{DailySummaryServiceDeps, DailySummaryServiceImpl},
    dashboard::{DashboardServiceDeps, DashboardServiceImpl},
    permission::PermissionServiceDeps,
    report::{ReportServiceDeps, ReportServiceImpl},
    session::{SessionServiceDeps, SessionServiceImpl},
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use thiserror::Error;
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;

type Context = Option<Arc<str>>;
type Transaction = TransactionImpl;
type TransactionDao = TransactionDaoImpl;
type UserDao = UserDaoImpl;
type ReportDao = ReportDaoImpl;
type SessionDao = SessionDaoImpl;

type UserService = service_impl::UserServiceImpl;
type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;
type ConfigService = service_impl::config::ConfigServiceImpl;
type PasswordService = service_impl::password::PasswordServiceImpl<UuidService>;

pub struct PermissionServiceDependencies;
impl PermissionServiceDeps for PermissionServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type UserDao = UserDao;
    type UserService = UserService;
    type TransactionDao = TransactionDao;
}
type PermissionService = service_impl::PermissionServiceImpl<PermissionServiceDependencies>;

pub struct SessionServiceDependencies;
impl SessionServiceDeps for SessionServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type SessionDao = SessionDao;
    type UuidService = UuidService;
    type ClockService = ClockService;
    type ConfigService = ConfigService;
}
type SessionService = SessionServiceImpl<SessionServiceDependencies>;

pub struct AccountServiceDependencies;
impl AccountServiceDeps for AccountServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type UserDao = UserDao;
    type PermissionService = PermissionService;
    type PasswordService = PasswordService;
    type UuidService = UuidService;
    type ClockService = ClockService;
    type TransactionDao = TransactionDao;
}
type AccountServiceType = AccountServiceImpl<AccountServiceDependencies>;

pub struct ReportServiceDependencies;
impl ReportServiceDeps for ReportServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type ReportDao = ReportDao;
    type AccountService = AccountServiceType;
    type PermissionService = PermissionService;
    type UuidService = UuidService;
    type ClockService = ClockService;
    type TransactionDao = TransactionDao;
}
type ReportService = ReportServiceImpl<ReportServiceDependencies>;

pub struct DailySummaryServiceDependencies;
impl DailySummaryServiceDeps for DailySummaryServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type ReportService = ReportService;
    type AccountService = AccountServiceType;
    type PermissionService = PermissionService;
    type TransactionDao = TransactionDao;
}
type DailySummaryService = DailySummaryServiceImpl<DailySummaryServiceDependencies>;

pub struct DashboardServiceDependencies;
impl DashboardServiceDeps for DashboardServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type AccountService = AccountServiceType;
    type ReportService = ReportService;
    type ConfigService = ConfigService;
    type TransactionDao = TransactionDao;
}
type DashboardService = DashboardServiceImpl<DashboardServiceDependencies>;

#[derive(Clone)]
pub struct RestStateImpl {
    user_service: Arc<UserService>,
    session_service: Arc<SessionService>,
    permission_service: Arc<PermissionService>,
    account_service: Arc<AccountServiceType>,
    report_service: Arc<ReportService>,
    daily_summary_service: Arc<DailySummaryService>,
    dashboard_service: Arc<DashboardService>,
}
impl rest::RestStateDef for RestStateImpl {
    type UserService = UserService;
    type SessionService = SessionService;
    type PermissionService = PermissionService;
    type AccountService = AccountServiceType;
    type ReportService = ReportService;
    type DailySummaryService = DailySummaryService;
    type DashboardService = DashboardService;

    fn backend_version(&self) -> Arc<str> {
        Arc::from(env!("CARGO_PKG_VERSION"))
    }

    fn user_service(&self) -> Arc<Self::UserService> {
        self.user_service.clone()
    }
    fn session_service(&self) -> Arc<Self::SessionService> {
        self.session_service.clone()
    }
    fn permission_service(&self) -> Arc<Self::PermissionService> {
        self.permission_service.clone()
    }
    fn account_service(&self) -> Arc<Self::AccountService> {
        self.account_service.clone()
    }
    fn report_service(&self) -> Arc<Self::ReportService> {
        self.report_service.clone()
    }
    fn daily_summary_service(&self) -> Arc<Self::DailySummaryService> {
        self.daily_summary_service.clone()
    }
    fn dashboard_service(&self) -> Arc<Self::DashboardService> {
        self.dashboard_service.clone()
    }
}
impl RestStateImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let user_dao = Arc::new(UserDao::new(pool.clone()));
        let report_dao = Arc::new(ReportDao::new(pool.clone()));
        let session_dao = Arc::new(SessionDao::new(pool.clone()));

        let user_service = Arc::new(service_impl::UserServiceImpl);
        let clock_service = Arc::new(service_impl::clock::ClockServiceImpl);
        let uuid_service = Arc::new(service_impl::uuid_service::UuidServiceImpl);
        let config_service = Arc::new(service_impl::config::ConfigServiceImpl);
        let password_service = Arc::new(PasswordService::new(uuid_service.clone()));

        let permission_service = Arc::new(PermissionService::new(
            user_dao.clone(),
            user_service.clone(),
            transaction_dao.clone(),
        ));
        let session_service = Arc::new(SessionService::new(
            session_dao,
            uuid_service.clone(),
            clock_service.clone(),
            config_service.clone(),
        ));
        let account_service = Arc::new(AccountServiceType::new(
            user_dao,
            permission_service.clone(),
            password_service,
            uuid_service.clone(),
            clock_service.clone(),
            transaction_dao.clone(),
        ));
        let report_service = Arc::new(ReportService::new(
            report_dao,
            account_service.clone(),
            permission_service.clone(),
            uuid_service,
            clock_service,
            transaction_dao.clone(),
        ));
        let daily_summary_service = Arc::new(DailySummaryService::new(
            report_service.clone(),
            account_service.clone(),
            permission_service.clone(),
            transaction_dao.clone(),
        ));
        let dashboard_service = Arc::new(DashboardService::new(
            account_service.clone(),
            report_service.clone(),
            config_service,
            transaction_dao,
        ));
        Self {
            user_service,
            session_service,
            permission_service,
            account_service,
            report_service,
            daily_summary_service,
            dashboard_service,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Logging setup failed: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Could not create the admin account: {0}")]
    AdminAccount(#[from] ServiceError),

    #[error("Server error: {0}")]
    Server(#[from] rest::RestError),
}

/// Creates the staff account from the environment on the first start.
async fn create_admin_user(rest_state: &RestStateImpl) -> Result<(), StartupError> {
    let username: Arc<str> = env::var("ADMIN_USERNAME")
        .unwrap_or_else(|_| "admin".to_string())
        .into();
    let account_service = rest_state.account_service.clone();
    if account_service
        .exists_by_username(&username, Authentication::Full, None)
        .await?
    {
        return Ok(());
    }
    let Ok(password) = env::var("ADMIN_PASSWORD") else {
        tracing::warn!(
            "No account {} and ADMIN_PASSWORD is not set, skipping admin creation",
            username
        );
        return Ok(());
    };
    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| format!("{}@localhost", username));
    let registration = Registration {
        username: username.clone(),
        email: email.into(),
        first_name: "Admin".into(),
        last_name: "Staff".into(),
        phone: "".into(),
        password: password.as_str().into(),
        password_confirmation: password.as_str().into(),
    };
    account_service
        .create_with_role(&registration, Role::Staff, Authentication::Full, None)
        .await?;
    tracing::info!("Created staff account {}", username);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let version = env!("CARGO_PKG_VERSION");
    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();
    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing::info!("Timesheet backend version: {}", version);
    dotenvy::dotenv().ok();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./localdb.sqlite3".to_string());
    let options = SqliteConnectOptions::from_str(&database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = Arc::new(SqlitePool::connect_with(options).await?);
    sqlx::migrate!("../migrations/sqlite")
        .run(pool.as_ref())
        .await?;

    let rest_state = RestStateImpl::new(pool);
    create_admin_user(&rest_state).await?;

    let address = env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    rest::start_server(rest_state, &address).await?;
    Ok(())
}
