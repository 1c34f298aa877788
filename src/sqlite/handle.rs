use async_trait::async_trait;
use rusqlite::{Connection, params_from_iter};

use crate::error::DialectTableError;
use crate::handle::DbHandle;
use crate::results::CustomDbRow;
use crate::types::{RowId, RowValues};

use super::params::Params;
use super::query::build_first_row;

/// rusqlite calls are synchronous; each method completes without yielding.
#[async_trait]
impl DbHandle for Connection {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<usize, DialectTableError> {
        let params = Params::convert(params);
        let mut stmt = self.prepare_cached(sql)?;
        let rows = stmt.execute(params_from_iter(params.as_values().iter()))?;
        Ok(rows)
    }

    async fn query_first(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<Option<CustomDbRow>, DialectTableError> {
        let params = Params::convert(params);
        let mut stmt = self.prepare_cached(sql)?;
        build_first_row(&mut stmt, params.as_values())
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), DialectTableError> {
        Connection::execute_batch(self, sql)?;
        Ok(())
    }

    fn last_insert_rowid(&self) -> Option<RowId> {
        Some(Connection::last_insert_rowid(self))
    }
}
