use crate::error::DialectTableError;
use crate::handle::DbHandle;
use crate::results::CustomDbRow;
use crate::statements::{IdRecovery, TableConfig};
use crate::types::{Dialect, RowId, RowValues};

/// Instance flags for a [`DialectTable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Refuse writes: lookups and inserts degrade to `None`, updates and deletes fail.
    pub read_only: bool,
    /// Run the create-schema statements while opening.
    pub create: bool,
    /// Run the drop-schema statements while opening; implies `create`.
    pub reset: bool,
    /// Log every dispatched statement at `debug` instead of `trace`.
    pub verbose: bool,
}

impl TableOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    #[must_use]
    pub fn with_create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    #[must_use]
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Fluent builder for a [`DialectTable`].
pub struct DialectTableBuilder<H> {
    handle: H,
    config: TableConfig,
    opts: TableOptions,
}

impl<H: DbHandle> DialectTableBuilder<H> {
    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.opts.read_only = read_only;
        self
    }

    #[must_use]
    pub fn create(mut self, create: bool) -> Self {
        self.opts.create = create;
        self
    }

    #[must_use]
    pub fn reset(mut self, reset: bool) -> Self {
        self.opts.reset = reset;
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.opts.verbose = verbose;
        self
    }

    /// Open the table, running any requested schema statements.
    ///
    /// # Errors
    ///
    /// See [`DialectTable::open`].
    pub async fn build(self) -> Result<DialectTable<H>, DialectTableError> {
        DialectTable::open(self.handle, self.config, self.opts).await
    }
}

/// Single-table access over a caller-supplied handle.
///
/// Statement text and id recovery are chosen by the dialect of the table's
/// [`TableConfig`]; the handle is never closed by the table.
///
/// ```rust,no_run
/// # use dialect_table::prelude::*;
/// # async fn demo(conn: &mut rusqlite::Connection) -> Result<(), DialectTableError> {
/// let config = LabelTable::config(Dialect::Sqlite)?;
/// let mut table = DialectTable::builder(conn, config).create(true).build().await?;
/// let id = table.resolve_or_create_id(&[RowValues::from("alpha")]).await?;
/// # let _ = id;
/// # Ok(())
/// # }
/// ```
pub struct DialectTable<H> {
    handle: H,
    config: TableConfig,
    read_only: bool,
    verbose: bool,
}

impl<H: DbHandle> DialectTable<H> {
    #[must_use]
    pub fn builder(handle: H, config: TableConfig) -> DialectTableBuilder<H> {
        DialectTableBuilder {
            handle,
            config,
            opts: TableOptions::default(),
        }
    }

    /// Wrap `handle`, dropping and/or creating the schema as `opts` asks.
    ///
    /// With `reset`, the drop statements run first and creation is forced.
    ///
    /// # Errors
    ///
    /// Returns the backend error of the first failing schema statement.
    pub async fn open(
        handle: H,
        config: TableConfig,
        opts: TableOptions,
    ) -> Result<Self, DialectTableError> {
        let mut table = Self {
            handle,
            config,
            read_only: opts.read_only,
            verbose: opts.verbose,
        };

        let mut create = opts.create;
        if opts.reset {
            create = true;
            table.drop_schema().await?;
        }
        if create {
            table.create_schema().await?;
        }
        Ok(table)
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.config.dialect()
    }

    #[must_use]
    pub fn data_size(&self) -> usize {
        self.config.data_size()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    #[must_use]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    /// Give the handle back to the caller.
    #[must_use]
    pub fn into_handle(self) -> H {
        self.handle
    }

    /// Id of the row matching `key`, inserting one if none exists.
    ///
    /// A read-only table returns `Ok(None)` instead of inserting.
    ///
    /// # Errors
    ///
    /// `Arity` when `key` has the wrong length (before any I/O), otherwise backend errors.
    pub async fn resolve_or_create_id(
        &mut self,
        key: &[RowValues],
    ) -> Result<Option<RowId>, DialectTableError> {
        self.check_arity("resolve_or_create_id", key)?;

        let sql = &self.config.statements().select_by_key;
        self.log_statement("resolve_or_create_id", sql);
        if let Some(row) = self.handle.query_first(sql, key).await? {
            return id_from_row(&row, "select_by_key").map(Some);
        }

        if self.read_only {
            return Ok(None);
        }
        self.insert_and_recover("resolve_or_create_id", key)
            .await
            .map(Some)
    }

    /// Fetch the row with `id`. The columns returned are those of the table's select-by-id
    /// statement.
    ///
    /// # Errors
    ///
    /// Backend errors.
    pub async fn get_by_id(
        &mut self,
        id: RowId,
    ) -> Result<Option<CustomDbRow>, DialectTableError> {
        let sql = &self.config.statements().select_by_id;
        self.log_statement("get_by_id", sql);
        self.handle.query_first(sql, &[RowValues::Int(id)]).await
    }

    /// Insert `key` without looking for an existing row; duplicates are allowed.
    ///
    /// A read-only table performs no I/O and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `Arity` when `key` has the wrong length, otherwise backend errors.
    pub async fn insert_row(
        &mut self,
        key: &[RowValues],
    ) -> Result<Option<RowId>, DialectTableError> {
        self.check_arity("insert_row", key)?;
        if self.read_only {
            return Ok(None);
        }
        self.insert_and_recover("insert_row", key).await.map(Some)
    }

    /// Overwrite the row `id` with `key`. Returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// `ReadOnlyViolation` on a read-only table, `Arity` on a wrong-length key, otherwise
    /// backend errors.
    pub async fn update_row(
        &mut self,
        id: RowId,
        key: &[RowValues],
    ) -> Result<usize, DialectTableError> {
        self.check_writable("update_row")?;
        self.check_arity("update_row", key)?;

        let mut params = Vec::with_capacity(key.len() + 1);
        params.extend_from_slice(key);
        params.push(RowValues::Int(id));

        let sql = &self.config.statements().update;
        self.log_statement("update_row", sql);
        self.handle.execute(sql, &params).await
    }

    /// Delete the row `id`. Deleting a missing id succeeds and returns 0.
    ///
    /// # Errors
    ///
    /// `ReadOnlyViolation` on a read-only table, otherwise backend errors.
    pub async fn delete_row(&mut self, id: RowId) -> Result<usize, DialectTableError> {
        self.check_writable("delete_row")?;

        let sql = &self.config.statements().delete;
        self.log_statement("delete_row", sql);
        self.handle.execute(sql, &[RowValues::Int(id)]).await
    }

    /// Run the create-schema statements in order.
    ///
    /// # Errors
    ///
    /// The first backend error; earlier statements stay applied.
    pub async fn create_schema(&mut self) -> Result<(), DialectTableError> {
        for sql in &self.config.statements().create_schema {
            self.log_statement("create_schema", sql);
            self.handle.execute_batch(sql).await?;
        }
        Ok(())
    }

    /// Run the drop-schema statements in order.
    ///
    /// # Errors
    ///
    /// The first backend error; earlier statements stay applied.
    pub async fn drop_schema(&mut self) -> Result<(), DialectTableError> {
        for sql in &self.config.statements().drop_schema {
            self.log_statement("drop_schema", sql);
            self.handle.execute_batch(sql).await?;
        }
        Ok(())
    }

    /// Insert, then learn the new id before anything else runs on the handle.
    async fn insert_and_recover(
        &mut self,
        operation: &'static str,
        key: &[RowValues],
    ) -> Result<RowId, DialectTableError> {
        let sql = &self.config.statements().insert;
        self.log_statement(operation, sql);
        self.handle.execute(sql, key).await?;

        let id = match self.config.id_recovery() {
            IdRecovery::LastInsertRowId => self.handle.last_insert_rowid().ok_or_else(|| {
                DialectTableError::ExecutionError(format!(
                    "handle does not report a last insert rowid for dialect {}",
                    self.dialect()
                ))
            })?,
            IdRecovery::SequenceCurrentValue(current_value) => {
                self.log_statement(operation, &current_value);
                let row = self
                    .handle
                    .query_first(&current_value, &[])
                    .await?
                    .ok_or_else(|| {
                        DialectTableError::ExecutionError(
                            "sequence current-value query returned no row".to_string(),
                        )
                    })?;
                id_from_row(&row, "current_value")?
            }
        };

        if self.verbose {
            tracing::debug!(operation, dialect = %self.dialect(), id, "recovered inserted id");
        } else {
            tracing::trace!(operation, dialect = %self.dialect(), id, "recovered inserted id");
        }
        Ok(id)
    }

    fn check_arity(
        &self,
        operation: &'static str,
        key: &[RowValues],
    ) -> Result<(), DialectTableError> {
        let expected = self.config.data_size();
        if key.len() == expected {
            Ok(())
        } else {
            Err(DialectTableError::Arity {
                operation,
                expected,
                actual: key.len(),
            })
        }
    }

    fn check_writable(&self, operation: &'static str) -> Result<(), DialectTableError> {
        if self.read_only {
            Err(DialectTableError::ReadOnlyViolation { operation })
        } else {
            Ok(())
        }
    }

    fn log_statement(&self, operation: &'static str, sql: &str) {
        if self.verbose {
            tracing::debug!(operation, dialect = %self.dialect(), sql, "dispatching statement");
        } else {
            tracing::trace!(operation, dialect = %self.dialect(), sql, "dispatching statement");
        }
    }
}

/// The id is the first column and must be an integer.
fn id_from_row(row: &CustomDbRow, statement: &str) -> Result<RowId, DialectTableError> {
    let first = row.get_by_index(0);
    first.and_then(RowValues::as_int).copied().ok_or_else(|| {
        DialectTableError::ExecutionError(format!(
            "{statement} returned {first:?} where an integer id was expected"
        ))
    })
}
