use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub place_description: Arc<str>,
    pub start_date: Date,
    pub start_hour: u8,
    pub end_date: Date,
    pub end_hour: u8,
    pub worked_hours: Decimal,
    pub created: PrimitiveDateTime,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ReportDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[ReportEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ReportEntity>, DaoError>;
    async fn find_by_user_id(
        &self,
        user_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReportEntity]>, DaoError>;
    async fn find_by_user_id_and_start_date(
        &self,
        user_id: Uuid,
        start_date: Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReportEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &ReportEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
