use std::sync::Arc;

use async_trait::async_trait;
use dao::{DaoError, Transaction};
use sqlx::SqlitePool;
use time::{macros::format_description, Date, PrimitiveDateTime};
use tokio::sync::Mutex;

pub mod report;
pub mod session;
pub mod user;

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: std::error::Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))
    }
}

pub(crate) fn format_date(date: Date) -> Result<String, DaoError> {
    Ok(date.format(format_description!("[year]-[month]-[day]"))?)
}

pub(crate) fn parse_date(value: &str) -> Result<Date, DaoError> {
    Ok(Date::parse(value, format_description!("[year]-[month]-[day]"))?)
}

pub(crate) fn format_date_time(date_time: PrimitiveDateTime) -> Result<String, DaoError> {
    Ok(date_time.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))?)
}

pub(crate) fn parse_date_time(value: &str) -> Result<PrimitiveDateTime, DaoError> {
    Ok(PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )?)
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_date_format_round_trip() {
        let formatted = format_date(date!(2024 - 01 - 02)).unwrap();
        assert_eq!("2024-01-02", formatted);
        assert_eq!(date!(2024 - 01 - 02), parse_date(&formatted).unwrap());
    }

    #[test]
    fn test_date_time_format() {
        let formatted = format_date_time(datetime!(2024-01-02 03:04:05)).unwrap();
        assert_eq!("2024-01-02 03:04:05", formatted);
        assert_eq!(
            datetime!(2024-01-02 03:04:05),
            parse_date_time(&formatted).unwrap()
        );
    }

    #[test]
    fn test_invalid_date() {
        assert!(matches!(
            parse_date("2024-13-01"),
            Err(DaoError::DateTimeParseError(_))
        ));
    }
}
