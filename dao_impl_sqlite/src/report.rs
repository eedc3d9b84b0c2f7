use std::str::FromStr;
use std::sync::Arc;

use crate::{
    format_date, format_date_time, parse_date, parse_date_time, ResultDbErrorExt,
    TransactionImpl,
};
use async_trait::async_trait;
use dao::{
    report::{ReportDao, ReportEntity},
    DaoError,
};
use rust_decimal::Decimal;
use sqlx::{query, query_as, SqlitePool};
use time::Date;
use uuid::Uuid;

const REPORT_COLUMNS: &str = "id, user_id, place_description, start_date, start_hour, end_date, end_hour, worked_hours, created, update_version";
const REPORT_ORDER: &str = "ORDER BY start_date DESC, start_hour DESC";

pub struct ReportDaoImpl {
    pub _pool: Arc<SqlitePool>,
}
impl ReportDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReportDb {
    id: Vec<u8>,
    user_id: Vec<u8>,
    place_description: String,
    start_date: String,
    start_hour: i64,
    end_date: String,
    end_hour: i64,
    worked_hours: String,
    created: String,
    update_version: Vec<u8>,
}

fn hour_from_db(hour: i64) -> Result<u8, DaoError> {
    u8::try_from(hour).map_err(|_| DaoError::ValueOutOfRange(hour.to_string().into()))
}

impl TryFrom<&ReportDb> for ReportEntity {
    type Error = DaoError;
    fn try_from(report: &ReportDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::from_slice(&report.id)?,
            user_id: Uuid::from_slice(&report.user_id)?,
            place_description: report.place_description.as_str().into(),
            start_date: parse_date(&report.start_date)?,
            start_hour: hour_from_db(report.start_hour)?,
            end_date: parse_date(&report.end_date)?,
            end_hour: hour_from_db(report.end_hour)?,
            worked_hours: Decimal::from_str(&report.worked_hours)?,
            created: parse_date_time(&report.created)?,
            version: Uuid::from_slice(&report.update_version)?,
        })
    }
}

fn collect_reports(rows: Vec<ReportDb>) -> Result<Arc<[ReportEntity]>, DaoError> {
    rows.iter()
        .map(ReportEntity::try_from)
        .collect::<Result<Arc<[ReportEntity]>, DaoError>>()
}

#[async_trait]
impl ReportDao for ReportDaoImpl {
    type Transaction = TransactionImpl;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[ReportEntity]>, DaoError> {
        let rows = query_as::<_, ReportDb>(&format!(
            "SELECT {REPORT_COLUMNS} FROM report {REPORT_ORDER}"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        collect_reports(rows)
    }

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ReportEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, ReportDb>(&format!(
            "SELECT {REPORT_COLUMNS} FROM report WHERE id = ?"
        ))
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ReportEntity::try_from)
        .transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReportEntity]>, DaoError> {
        let user_id_vec = user_id.as_bytes().to_vec();
        let rows = query_as::<_, ReportDb>(&format!(
            "SELECT {REPORT_COLUMNS} FROM report WHERE user_id = ? {REPORT_ORDER}"
        ))
        .bind(user_id_vec)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        collect_reports(rows)
    }

    async fn find_by_user_id_and_start_date(
        &self,
        user_id: Uuid,
        start_date: Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReportEntity]>, DaoError> {
        let user_id_vec = user_id.as_bytes().to_vec();
        let start_date = format_date(start_date)?;
        let rows = query_as::<_, ReportDb>(&format!(
            "SELECT {REPORT_COLUMNS} FROM report WHERE user_id = ? AND start_date = ? {REPORT_ORDER}"
        ))
        .bind(user_id_vec)
        .bind(start_date)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        collect_reports(rows)
    }

    async fn create(
        &self,
        entity: &ReportEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let id = entity.id.as_bytes().to_vec();
        let user_id = entity.user_id.as_bytes().to_vec();
        let version = entity.version.as_bytes().to_vec();
        let start_date = format_date(entity.start_date)?;
        let end_date = format_date(entity.end_date)?;
        let created = format_date_time(entity.created)?;
        let worked_hours = entity.worked_hours.to_string();
        query("INSERT INTO report (id, user_id, place_description, start_date, start_hour, end_date, end_hour, worked_hours, created, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(user_id)
            .bind(entity.place_description.as_ref())
            .bind(start_date)
            .bind(i64::from(entity.start_hour))
            .bind(end_date)
            .bind(i64::from(entity.end_hour))
            .bind(worked_hours)
            .bind(created)
            .bind(version)
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
