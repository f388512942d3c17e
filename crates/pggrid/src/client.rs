//! Generic client trait for unified database access.

use serde_json::{Map, Value};
use tokio_postgres::types::ToSql;

use crate::error::{GridError, GridResult};
use crate::row::row_to_map;

/// The execution boundary a [`TableView`](crate::TableView) drives.
///
/// Implementations run one prepared statement per call and hand rows back as
/// JSON maps keyed by result column name. Both a direct connection and a
/// transaction satisfy this, so a grid query can ride inside a larger unit
/// of work.
pub trait GridClient: Send + Sync {
    /// Execute a query and return all rows as raw maps.
    fn fetch(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = GridResult<Vec<Map<String, Value>>>> + Send;

    /// Execute a single-row count query and return its value.
    fn count(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = GridResult<i64>> + Send;
}

impl GridClient for tokio_postgres::Client {
    async fn fetch(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> GridResult<Vec<Map<String, Value>>> {
        let rows = tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(GridError::from_db_error)?;
        rows.iter().map(row_to_map).collect()
    }

    async fn count(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> GridResult<i64> {
        let row = tokio_postgres::Client::query_one(self, sql, params)
            .await
            .map_err(GridError::from_db_error)?;
        row.try_get(0)
            .map_err(|e| GridError::decode("count", e.to_string()))
    }
}

impl GridClient for tokio_postgres::Transaction<'_> {
    async fn fetch(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> GridResult<Vec<Map<String, Value>>> {
        let rows = tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(GridError::from_db_error)?;
        rows.iter().map(row_to_map).collect()
    }

    async fn count(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> GridResult<i64> {
        let row = tokio_postgres::Transaction::query_one(self, sql, params)
            .await
            .map_err(GridError::from_db_error)?;
        row.try_get(0)
            .map_err(|e| GridError::decode("count", e.to_string()))
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl GridClient for deadpool_postgres::Client {
    async fn fetch(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> GridResult<Vec<Map<String, Value>>> {
        // Delegate to the deref target (ClientWrapper).
        GridClient::fetch(&**self, sql, params).await
    }

    async fn count(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> GridResult<i64> {
        GridClient::count(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl GridClient for deadpool_postgres::ClientWrapper {
    async fn fetch(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> GridResult<Vec<Map<String, Value>>> {
        GridClient::fetch(&**self, sql, params).await
    }

    async fn count(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> GridResult<i64> {
        GridClient::count(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl GridClient for deadpool_postgres::Transaction<'_> {
    async fn fetch(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> GridResult<Vec<Map<String, Value>>> {
        GridClient::fetch(&**self, sql, params).await
    }

    async fn count(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> GridResult<i64> {
        GridClient::count(&**self, sql, params).await
    }
}

// ===== Reference implementations =====
// These let a view borrow a client that something else owns.

impl<C: GridClient> GridClient for &C {
    async fn fetch(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> GridResult<Vec<Map<String, Value>>> {
        (*self).fetch(sql, params).await
    }

    async fn count(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> GridResult<i64> {
        (*self).count(sql, params).await
    }
}
