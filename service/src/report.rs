use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::report::ReportEntity;
use mockall::automock;
use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime};
use timesheet_utils::WorkPeriod;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::{ServiceError, ValidationFailureItem};

pub const MAX_PLACE_DESCRIPTION_LENGTH: usize = 500;

/// Largest value the worked hours column can hold.
pub fn max_worked_hours() -> Decimal {
    Decimal::new(99999, 2)
}

/// The fields an employee enters for a new report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSubmission {
    pub place_description: Arc<str>,
    pub start_date: Date,
    pub start_hour: u8,
    pub end_date: Date,
    pub end_hour: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub id: Uuid,
    pub user_id: Uuid,
    pub place_description: Arc<str>,
    period: WorkPeriod,
    pub created: Option<PrimitiveDateTime>,
    pub version: Uuid,
    worked_hours: Decimal,
}

impl Report {
    /// Builds a report and derives its worked hours from the period.
    pub fn new(
        id: Uuid,
        user_id: Uuid,
        place_description: Arc<str>,
        period: WorkPeriod,
        created: Option<PrimitiveDateTime>,
        version: Uuid,
    ) -> Self {
        Self {
            id,
            user_id,
            place_description,
            period,
            created,
            version,
            worked_hours: period.worked_hours(),
        }
    }

    pub fn period(&self) -> &WorkPeriod {
        &self.period
    }

    pub fn worked_hours(&self) -> Decimal {
        self.worked_hours
    }
}

impl TryFrom<&ReportEntity> for Report {
    type Error = ServiceError;

    fn try_from(report: &ReportEntity) -> Result<Self, Self::Error> {
        let period = WorkPeriod::new(
            report.start_date,
            report.start_hour,
            report.end_date,
            report.end_hour,
        )
        .map_err(|_| ServiceError::InternalError)?;
        Ok(Self::new(
            report.id,
            report.user_id,
            report.place_description.clone(),
            period,
            Some(report.created),
            report.version,
        ))
    }
}

impl TryFrom<&Report> for ReportEntity {
    type Error = ServiceError;

    fn try_from(report: &Report) -> Result<Self, Self::Error> {
        Ok(Self {
            id: report.id,
            user_id: report.user_id,
            place_description: report.place_description.clone(),
            start_date: report.period().start_date(),
            start_hour: report.period().start_hour(),
            end_date: report.period().end_date(),
            end_hour: report.period().end_hour(),
            worked_hours: report.worked_hours(),
            created: report.created.ok_or(ServiceError::InternalError)?,
            version: report.version,
        })
    }
}

/// Checks a submission and returns its work period.
///
/// All failures are collected so the caller can show them at once.
pub fn validate_submission(submission: &ReportSubmission) -> Result<WorkPeriod, ServiceError> {
    let mut failures = Vec::new();

    let place = submission.place_description.trim();
    if place.is_empty() {
        failures.push(ValidationFailureItem::Missing("place_description".into()));
    } else if submission.place_description.chars().count() > MAX_PLACE_DESCRIPTION_LENGTH {
        failures.push(ValidationFailureItem::TooLong(
            "place_description".into(),
            MAX_PLACE_DESCRIPTION_LENGTH,
        ));
    }

    let period = match WorkPeriod::new(
        submission.start_date,
        submission.start_hour,
        submission.end_date,
        submission.end_hour,
    ) {
        Ok(period) => Some(period),
        Err(_) => {
            if submission.start_hour > 23 {
                failures.push(ValidationFailureItem::InvalidValue("start_hour".into()));
            }
            if submission.end_hour > 23 {
                failures.push(ValidationFailureItem::InvalidValue("end_hour".into()));
            }
            None
        }
    };

    if let Some(period) = period {
        if !period.is_chronological() {
            failures.push(ValidationFailureItem::EndNotAfterStart);
        } else if period.worked_hours() > max_worked_hours() {
            failures.push(ValidationFailureItem::InvalidValue("end_date".into()));
        }
    }

    match period {
        Some(period) if failures.is_empty() => Ok(period),
        _ => Err(ServiceError::ValidationError(failures.into())),
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait ReportService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError>;

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Report, ServiceError>;

    async fn get_for_current_user(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError>;

    async fn get_by_user_and_date(
        &self,
        user_id: Uuid,
        date: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError>;

    async fn get_by_user(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError>;

    /// Creates a report owned by the current user.
    async fn create(
        &self,
        submission: &ReportSubmission,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Report, ServiceError>;
}
