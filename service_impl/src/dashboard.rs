use async_trait::async_trait;
use dao::TransactionDao;
use service::{
    account::AccountService,
    config::ConfigService,
    dashboard::{Dashboard, DashboardService},
    permission::{Authentication, Role},
    report::ReportService,
    ServiceError,
};

use crate::gen_service_impl;

gen_service_impl! {
    struct DashboardServiceImpl: DashboardService = DashboardServiceDeps {
        AccountService: AccountService<Context = Self::Context, Transaction = Self::Transaction> = account_service,
        ReportService: ReportService<Context = Self::Context, Transaction = Self::Transaction> = report_service,
        ConfigService: ConfigService = config_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao
    }
}

#[async_trait]
impl<Deps: DashboardServiceDeps> DashboardService for DashboardServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn dashboard(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Dashboard, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let user = self
            .account_service
            .current_account(context.clone(), tx.clone().into())
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        let dashboard = if user.is_pending() {
            Dashboard::PendingApproval { user }
        } else {
            match user.role {
                Role::Staff => Dashboard::Staff {
                    pending_users: self
                        .account_service
                        .get_pending(context.clone(), tx.clone().into())
                        .await?,
                    users: self
                        .account_service
                        .get_all(context.clone(), tx.clone().into())
                        .await?,
                    user,
                },
                Role::Accountant => Dashboard::Accountant {
                    reports: self
                        .report_service
                        .get_all(context.clone(), tx.clone().into())
                        .await?,
                    employees: self
                        .account_service
                        .get_approved_employees(context.clone(), tx.clone().into())
                        .await?,
                    user,
                },
                Role::Employee => {
                    let limit = self.config_service.get_config().await?.dashboard_report_limit;
                    let reports = self
                        .report_service
                        .get_for_current_user(context.clone(), tx.clone().into())
                        .await?;
                    Dashboard::Employee {
                        recent_reports: reports.iter().take(limit).cloned().collect(),
                        user,
                    }
                }
            }
        };

        self.transaction_dao.commit(tx).await?;
        Ok(dashboard)
    }
}
