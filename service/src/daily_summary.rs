use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use time::Date;
use timesheet_utils::HoursSplit;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::report::Report;
use crate::ServiceError;

/// Hours of one user on one calendar day, split at the regular threshold.
///
/// A report belongs to the day it starts on, also if it runs past midnight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailySummary {
    pub date: Date,
    pub total_hours: Decimal,
    pub regular_hours: Decimal,
    pub overtime_hours: Decimal,
    pub reports: Arc<[Report]>,
}

impl DailySummary {
    /// Reports which do not start on `date` are ignored.
    pub fn from_reports(date: Date, reports: &[Report]) -> Self {
        let reports: Arc<[Report]> = reports
            .iter()
            .filter(|report| report.period().start_date() == date)
            .cloned()
            .collect();
        let split: HoursSplit = reports.iter().map(Report::worked_hours).collect();
        Self {
            date,
            total_hours: split.total,
            regular_hours: split.regular,
            overtime_hours: split.overtime,
            reports,
        }
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait DailySummaryService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Fails with `EntityNotFound` if the user does not exist.
    async fn summarize(
        &self,
        user_id: Uuid,
        date: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<DailySummary, ServiceError>;

    /// One summary per day the employee has reports on, newest day first.
    async fn performance(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[DailySummary]>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use timesheet_utils::WorkPeriod;

    fn report(start_hour: u8, end_hour: u8) -> Report {
        Report::new(
            Uuid::new_v4(),
            Uuid::nil(),
            "Site".into(),
            WorkPeriod::new(date!(2024 - 01 - 01), start_hour, date!(2024 - 01 - 01), end_hour)
                .unwrap(),
            None,
            Uuid::nil(),
        )
    }

    #[test]
    fn test_summary_with_overtime() {
        let summary = DailySummary::from_reports(
            date!(2024 - 01 - 01),
            &[report(6, 9), report(10, 14), report(15, 17)],
        );
        assert_eq!(Decimal::new(9, 0), summary.total_hours);
        assert_eq!(Decimal::new(8, 0), summary.regular_hours);
        assert_eq!(Decimal::new(1, 0), summary.overtime_hours);
        assert_eq!(3, summary.reports.len());
    }

    #[test]
    fn test_summary_without_reports() {
        let summary = DailySummary::from_reports(date!(2024 - 01 - 01), &[]);
        assert_eq!(Decimal::ZERO, summary.total_hours);
        assert_eq!(Decimal::ZERO, summary.regular_hours);
        assert_eq!(Decimal::ZERO, summary.overtime_hours);
    }
}
