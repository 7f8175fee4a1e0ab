//! SQLite store backed by an sqlx pool.

use oxide_predicate::{Compiled, Dialect, SqlValue, SqliteDialect};
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, Sqlite};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::statement::Statement;
use crate::store::Store;

/// Executes compiled filters against a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    dialect: SqliteDialect,
}

impl SqliteStore {
    /// Connects to `url` (e.g. `sqlite::memory:` or `sqlite://data.db`).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] when the connection fails.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self::from_pool(pool))
    }

    /// Wraps an existing pool.
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            dialect: SqliteDialect::new(),
        }
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the rows of `table` matching `compiled`, in its order.
    ///
    /// # Errors
    ///
    /// Fails on parameters SQLite cannot bind, on a placeholder/parameter
    /// mismatch, and on database errors.
    pub async fn fetch_all(&self, table: &str, compiled: &Compiled) -> Result<Vec<SqliteRow>> {
        let sql = self.prepare(Statement::Select, table, compiled)?;
        let mut query = sqlx::query(&sql);
        for (index, param) in compiled.params.iter().enumerate() {
            query = self.bind_param_raw(query, index, param)?;
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Like [`SqliteStore::fetch_all`], mapping rows into `T`.
    ///
    /// # Errors
    ///
    /// See [`SqliteStore::fetch_all`].
    pub async fn fetch_as<T>(&self, table: &str, compiled: &Compiled) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let sql = self.prepare(Statement::Select, table, compiled)?;
        let mut query = sqlx::query_as::<_, T>(&sql);
        for (index, param) in compiled.params.iter().enumerate() {
            query = self.bind_param(query, index, param)?;
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Counts the rows of `table` matching `compiled`.
    ///
    /// # Errors
    ///
    /// See [`SqliteStore::fetch_all`].
    pub async fn count(&self, table: &str, compiled: &Compiled) -> Result<i64> {
        let sql = self.prepare(Statement::Count, table, compiled)?;
        let mut query = sqlx::query(&sql);
        for (index, param) in compiled.params.iter().enumerate() {
            query = self.bind_param_raw(query, index, param)?;
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row.try_get(0)?)
    }

    /// Deletes the rows of `table` matching `compiled` and returns how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// See [`SqliteStore::fetch_all`].
    pub async fn delete(&self, table: &str, compiled: &Compiled) -> Result<u64> {
        let sql = self.prepare(Statement::Delete, table, compiled)?;
        let mut query = sqlx::query(&sql);
        for (index, param) in compiled.params.iter().enumerate() {
            query = self.bind_param_raw(query, index, param)?;
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    fn prepare(&self, statement: Statement, table: &str, compiled: &Compiled) -> Result<String> {
        compiled.check_parity()?;
        let sql = self.statement(statement, table, compiled);
        debug!(sql = %sql, params = compiled.params.len(), "Executing SQL");
        Ok(sql)
    }

    fn unsupported(&self, index: usize, value: &SqlValue) -> StoreError {
        StoreError::UnsupportedParameter {
            index,
            kind: value.kind(),
            dialect: self.dialect.name(),
        }
    }

    fn bind_param<'q, T>(
        &self,
        query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
        index: usize,
        value: &SqlValue,
    ) -> Result<QueryAs<'q, Sqlite, T, SqliteArguments<'q>>> {
        Ok(match value {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Blob(b) => query.bind(b.clone()),
            SqlValue::Array(_) => return Err(self.unsupported(index, value)),
        })
    }

    fn bind_param_raw<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        index: usize,
        value: &SqlValue,
    ) -> Result<Query<'q, Sqlite, SqliteArguments<'q>>> {
        Ok(match value {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => query.bind(*b),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.clone()),
            SqlValue::Blob(b) => query.bind(b.clone()),
            SqlValue::Array(_) => return Err(self.unsupported(index, value)),
        })
    }
}

impl Store for SqliteStore {
    type Dialect = SqliteDialect;

    fn dialect(&self) -> &SqliteDialect {
        &self.dialect
    }
}
