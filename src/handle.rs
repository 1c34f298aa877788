use async_trait::async_trait;

use crate::error::DialectTableError;
use crate::results::CustomDbRow;
use crate::types::{RowId, RowValues};

/// An open database handle a table can dispatch statements on.
///
/// The handle is owned by the caller: tables borrow or hold it but never close it. All calls
/// made by one table operation happen back to back on the same connection, which is what makes
/// per-connection id recovery sound.
#[async_trait]
pub trait DbHandle: Send {
    /// Execute a statement with positional parameters, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Returns the driver error unchanged, or `ParameterError` when a value does not fit the
    /// parameter type the backend declared (Postgres integer widths).
    async fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DialectTableError>;

    /// Run a query and return its first row, if any.
    ///
    /// # Errors
    ///
    /// Returns the driver error unchanged, or `ParameterError` when a value does not fit the
    /// parameter type the backend declared (Postgres integer widths).
    async fn query_first(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, DialectTableError>;

    /// Execute parameterless SQL, such as DDL.
    ///
    /// # Errors
    ///
    /// Returns the driver error unchanged.
    async fn execute_batch(&mut self, sql: &str) -> Result<(), DialectTableError>;

    /// Rowid of the last successful insert on this connection, when the backend tracks one.
    fn last_insert_rowid(&self) -> Option<RowId>;
}

#[async_trait]
impl<T: DbHandle + ?Sized> DbHandle for &mut T {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DialectTableError> {
        (**self).execute(sql, params).await
    }

    async fn query_first(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, DialectTableError> {
        (**self).query_first(sql, params).await
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DialectTableError> {
        (**self).execute_batch(sql).await
    }

    fn last_insert_rowid(&self) -> Option<RowId> {
        (**self).last_insert_rowid()
    }
}

#[async_trait]
impl<T: DbHandle + ?Sized> DbHandle for Box<T> {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DialectTableError> {
        (**self).execute(sql, params).await
    }

    async fn query_first(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, DialectTableError> {
        (**self).query_first(sql, params).await
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DialectTableError> {
        (**self).execute_batch(sql).await
    }

    fn last_insert_rowid(&self) -> Option<RowId> {
        (**self).last_insert_rowid()
    }
}
