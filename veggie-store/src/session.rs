use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use veggie_core::{CoreResult, Store, StoreSession};

use crate::error::{StoreError, StoreResult};

/// `Store` over a SQLite pool. Each session is one database transaction.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Store for SqliteStore {
    type Session = SqliteSession;

    async fn begin(&self) -> CoreResult<SqliteSession> {
        let tx = self.pool.begin().await.map_err(StoreError::from)?;
        Ok(SqliteSession { tx })
    }
}

/// Open transaction. Rolled back when dropped without `commit`.
pub struct SqliteSession {
    pub(crate) tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl StoreSession for SqliteSession {
    async fn commit(self) -> CoreResult<()> {
        self.tx.commit().await.map_err(StoreError::from)?;
        Ok(())
    }
}

pub(crate) fn decimal(column: &'static str, value: &str) -> StoreResult<Decimal> {
    Decimal::from_str(value).map_err(|source| StoreError::Decimal {
        column,
        value: value.to_string(),
        source,
    })
}

pub(crate) fn enum_value<T: FromStr>(column: &'static str, value: &str) -> StoreResult<T> {
    T::from_str(value).map_err(|_| StoreError::Enum {
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DbClient;
    use rust_decimal_macros::dec;
    use veggie_core::CustomerRepository;
    use veggie_shared::models::{Customer, CustomerType};

    #[tokio::test]
    async fn test_commit_persists_and_drop_rolls_back() {
        let store = DbClient::in_memory().await.unwrap().store();

        let kept = Customer::new("Lakshmi Stores", CustomerType::Wholesale, dec!(5000.50));
        let mut session = store.begin().await.unwrap();
        session.save_customer(&kept).await.unwrap();
        session.commit().await.unwrap();

        let discarded = Customer::new("Walk-in", CustomerType::Retail, dec!(0));
        {
            let mut session = store.begin().await.unwrap();
            session.save_customer(&discarded).await.unwrap();
        }

        let mut session = store.begin().await.unwrap();
        let loaded = session.customer(kept.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Lakshmi Stores");
        assert_eq!(loaded.customer_type, CustomerType::Wholesale);
        assert_eq!(loaded.credit_limit, dec!(5000.50));
        assert!(session.customer(discarded.id).await.unwrap().is_none());
    }

    #[test]
    fn test_column_decoding_errors() {
        assert_eq!(decimal("t.c", "12.75").unwrap(), dec!(12.75));
        assert!(matches!(decimal("t.c", "abc"), Err(StoreError::Decimal { .. })));
        assert!(matches!(
            enum_value::<CustomerType>("customers.customer_type", "Vip"),
            Err(StoreError::Enum { .. })
        ));
    }
}
