use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dao::TransactionDao;
use service::{
    account::AccountService,
    daily_summary::{DailySummary, DailySummaryService},
    permission::{Authentication, Privilege, Role},
    report::{Report, ReportService},
    PermissionService, ServiceError,
};
use time::Date;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct DailySummaryServiceImpl: DailySummaryService = DailySummaryServiceDeps {
        ReportService: ReportService<Context = Self::Context, Transaction = Self::Transaction> = report_service,
        AccountService: AccountService<Context = Self::Context, Transaction = Self::Transaction> = account_service,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao
    }
}

#[async_trait]
impl<Deps: DailySummaryServiceDeps> DailySummaryService for DailySummaryServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn summarize(
        &self,
        user_id: Uuid,
        date: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<DailySummary, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let reports = self
            .report_service
            .get_by_user_and_date(user_id, date, context, tx.clone().into())
            .await?;
        self.account_service
            .get(user_id, Authentication::Full, tx.clone().into())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(DailySummary::from_reports(date, &reports))
    }

    async fn performance(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[DailySummary]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::ReviewReports, context, tx.clone().into())
            .await?;
        let employee = self
            .account_service
            .get(user_id, Authentication::Full, tx.clone().into())
            .await?;
        if employee.role != Role::Employee {
            return Err(ServiceError::EntityNotFound(user_id));
        }

        let mut days: BTreeMap<Date, Vec<Report>> = BTreeMap::new();
        for report in self
            .report_service
            .get_by_user(user_id, Authentication::Full, tx.clone().into())
            .await?
            .iter()
        {
            days.entry(report.period().start_date())
                .or_default()
                .push(report.clone());
        }
        self.transaction_dao.commit(tx).await?;

        Ok(days
            .iter()
            .rev()
            .map(|(date, reports)| DailySummary::from_reports(*date, reports))
            .collect())
    }
}
