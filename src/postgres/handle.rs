use async_trait::async_trait;
use tokio_postgres::Client;

use crate::error::DialectTableError;
use crate::handle::DbHandle;
use crate::results::CustomDbRow;
use crate::types::{RowId, RowValues};

use super::params::Params;
use super::query::build_first_row;

/// Statements are prepared first so integer parameters can be checked against the declared
/// parameter types before they are sent.
#[async_trait]
impl DbHandle for Client {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DialectTableError> {
        let stmt = self.prepare(sql).await?;
        let converted = Params::convert(params, stmt.params())?;
        let rows = Client::execute(self, &stmt, converted.as_refs()).await?;
        usize::try_from(rows).map_err(|e| {
            DialectTableError::ExecutionError(format!(
                "postgres affected rows conversion error: {e}"
            ))
        })
    }

    async fn query_first(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, DialectTableError> {
        let stmt = self.prepare(sql).await?;
        let converted = Params::convert(params, stmt.params())?;
        let rows = self.query(&stmt, converted.as_refs()).await?;
        build_first_row(&rows)
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DialectTableError> {
        self.batch_execute(sql).await?;
        Ok(())
    }

    /// Postgres has no connection rowid; ids come from sequences.
    fn last_insert_rowid(&self) -> Option<RowId> {
        None
    }
}
