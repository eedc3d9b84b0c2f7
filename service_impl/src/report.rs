use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    report::{ReportDao, ReportEntity},
    TransactionDao,
};
use service::{
    account::AccountService,
    clock::ClockService,
    permission::{Authentication, Privilege},
    report::{validate_submission, Report, ReportService, ReportSubmission},
    uuid_service::UuidService,
    PermissionService, ServiceError,
};
use time::Date;
use tokio::join;
use uuid::Uuid;

use crate::gen_service_impl;

const REPORT_SERVICE_PROCESS: &str = "report-service";

gen_service_impl! {
    struct ReportServiceImpl: ReportService = ReportServiceDeps {
        ReportDao: ReportDao<Transaction = Self::Transaction> = report_dao,
        AccountService: AccountService<Context = Self::Context, Transaction = Self::Transaction> = account_service,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        UuidService: UuidService = uuid_service,
        ClockService: ClockService = clock_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao
    }
}

fn to_reports(entities: &[ReportEntity]) -> Result<Arc<[Report]>, ServiceError> {
    entities.iter().map(Report::try_from).collect()
}

impl<Deps: ReportServiceDeps> ReportServiceImpl<Deps> {
    /// Reviewers may see every user's reports, everyone else only their own.
    async fn check_reviewer_or_owner(
        &self,
        user_id: Uuid,
        context: Authentication<Deps::Context>,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        let (review_permission, owner_permission) = join!(
            self.permission_service.check_permission(
                Privilege::ReviewReports,
                context.clone(),
                tx.clone().into()
            ),
            self.account_service
                .verify_user(user_id, context.clone(), tx.clone().into()),
        );
        review_permission.or(owner_permission)
    }
}

#[async_trait]
impl<Deps: ReportServiceDeps> ReportService for ReportServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::ReviewReports, context, tx.clone().into())
            .await?;
        let reports = to_reports(&self.report_dao.all(tx.clone()).await?)?;
        self.transaction_dao.commit(tx).await?;
        Ok(reports)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Report, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let entity = self
            .report_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.check_reviewer_or_owner(entity.user_id, context, tx.clone())
            .await?;
        let report = Report::try_from(&entity)?;
        self.transaction_dao.commit(tx).await?;
        Ok(report)
    }

    async fn get_for_current_user(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::SubmitReports, context.clone(), tx.clone().into())
            .await?;
        let user = self
            .account_service
            .current_account(context, tx.clone().into())
            .await?
            .ok_or(ServiceError::Forbidden)?;
        let reports = to_reports(&self.report_dao.find_by_user_id(user.id, tx.clone()).await?)?;
        self.transaction_dao.commit(tx).await?;
        Ok(reports)
    }

    async fn get_by_user_and_date(
        &self,
        user_id: Uuid,
        date: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_reviewer_or_owner(user_id, context, tx.clone())
            .await?;
        let reports = to_reports(
            &self
                .report_dao
                .find_by_user_id_and_start_date(user_id, date, tx.clone())
                .await?,
        )?;
        self.transaction_dao.commit(tx).await?;
        Ok(reports)
    }

    async fn get_by_user(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_reviewer_or_owner(user_id, context, tx.clone())
            .await?;
        let reports = to_reports(&self.report_dao.find_by_user_id(user_id, tx.clone()).await?)?;
        self.transaction_dao.commit(tx).await?;
        Ok(reports)
    }

    async fn create(
        &self,
        submission: &ReportSubmission,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Report, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(Privilege::SubmitReports, context.clone(), tx.clone().into())
            .await?;
        let user = self
            .account_service
            .current_account(context, tx.clone().into())
            .await?
            .ok_or(ServiceError::Forbidden)?;

        let period = validate_submission(submission)?;
        let report = Report::new(
            self.uuid_service.new_uuid("create-id"),
            user.id,
            submission.place_description.trim().into(),
            period,
            Some(self.clock_service.date_time_now()),
            self.uuid_service.new_uuid("create-version"),
        );
        let entity = ReportEntity::try_from(&report)?;
        self.report_dao
            .create(&entity, REPORT_SERVICE_PROCESS, tx.clone())
            .await?;
        tracing::info!(
            "{} reported {} hours starting {}",
            user.username,
            report.worked_hours(),
            period.start_date()
        );

        self.transaction_dao.commit(tx).await?;
        Ok(report)
    }
}
