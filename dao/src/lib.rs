use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod report;
pub mod session;
pub mod user;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Uuid parse error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Date time format error: {0}")]
    DateTimeFormatError(#[from] time::error::Format),

    #[error("Date time parse error: {0}")]
    DateTimeParseError(#[from] time::error::Parse),

    #[error("Decimal parse error: {0}")]
    DecimalError(#[from] rust_decimal::Error),

    #[error("Enum value not found: {0}")]
    EnumValueNotFound(Arc<str>),

    #[error("Value out of range: {0}")]
    ValueOutOfRange(Arc<str>),
}

pub trait Transaction: Clone + Debug + Send + Sync + 'static {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;
    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError>;
}
