//! Typed tables: a fixed-arity key type per table, statements per dialect by exhaustive match.

use std::marker::PhantomData;

use crate::error::DialectTableError;
use crate::handle::DbHandle;
use crate::results::CustomDbRow;
use crate::statements::{DialectStatements, Statements, TableConfig};
use crate::table::{DialectTable, TableOptions};
use crate::types::{Dialect, RowId, RowValues};

/// A key tuple of fixed arity.
pub trait KeyTuple: Sized {
    /// Number of values bound for this key.
    const ARITY: usize;

    /// The values to bind, in statement order. Must yield exactly `ARITY` values.
    fn to_params(&self) -> Vec<RowValues>;

    /// Decode a row fetched by id.
    ///
    /// # Errors
    ///
    /// `ExecutionError` when the row does not have the expected shape.
    fn from_row(row: &CustomDbRow) -> Result<Self, DialectTableError>;
}

impl<const N: usize> KeyTuple for [RowValues; N] {
    const ARITY: usize = N;

    fn to_params(&self) -> Vec<RowValues> {
        self.to_vec()
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, DialectTableError> {
        if row.len() < N {
            return Err(DialectTableError::ExecutionError(format!(
                "row has {} columns, key needs {N}",
                row.len()
            )));
        }
        Ok(std::array::from_fn(|i| row.rows[i].clone()))
    }
}

/// A concrete table: its key type and its statements for every dialect.
pub trait TableSpec {
    type Key: KeyTuple;

    /// Statements for `dialect`. Implementations match exhaustively on `Dialect`.
    fn statements(dialect: Dialect) -> DialectStatements;

    /// Validated configuration for `dialect`.
    ///
    /// # Errors
    ///
    /// `ConfigError` when the statements are blank or not for `dialect`.
    fn config(dialect: Dialect) -> Result<TableConfig, DialectTableError> {
        let statements = Self::statements(dialect);
        if statements.dialect() != dialect {
            return Err(DialectTableError::ConfigError(format!(
                "statements for {} supplied for dialect {dialect}",
                statements.dialect()
            )));
        }
        TableConfig::new(Self::Key::ARITY, statements)
    }
}

/// [`DialectTable`] keyed by `S::Key` instead of value slices.
pub struct TypedTable<H, S> {
    inner: DialectTable<H>,
    _spec: PhantomData<fn() -> S>,
}

impl<H: DbHandle, S: TableSpec> TypedTable<H, S> {
    /// Open the table for `dialect` over `handle`.
    ///
    /// # Errors
    ///
    /// Config errors from `S`, then backend errors from schema statements.
    pub async fn open(
        handle: H,
        dialect: Dialect,
        opts: TableOptions,
    ) -> Result<Self, DialectTableError> {
        let config = S::config(dialect)?;
        let inner = DialectTable::open(handle, config, opts).await?;
        Ok(Self {
            inner,
            _spec: PhantomData,
        })
    }

    /// Same as [`TypedTable::open`] with the dialect given as a tag such as `"PG"`.
    ///
    /// # Errors
    ///
    /// `UnsupportedDialect` for unknown tags, otherwise as [`TypedTable::open`].
    pub async fn open_tag(
        handle: H,
        tag: &str,
        opts: TableOptions,
    ) -> Result<Self, DialectTableError> {
        let dialect: Dialect = tag.parse()?;
        Self::open(handle, dialect, opts).await
    }

    #[must_use]
    pub fn inner(&self) -> &DialectTable<H> {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut DialectTable<H> {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> DialectTable<H> {
        self.inner
    }

    /// # Errors
    ///
    /// See [`DialectTable::resolve_or_create_id`].
    pub async fn resolve_or_create_id(
        &mut self,
        key: &S::Key,
    ) -> Result<Option<RowId>, DialectTableError> {
        self.inner.resolve_or_create_id(&key.to_params()).await
    }

    /// Fetch and decode the row `id`.
    ///
    /// # Errors
    ///
    /// Backend errors, or `ExecutionError` if the row does not decode as `S::Key`.
    pub async fn get_by_id(&mut self, id: RowId) -> Result<Option<S::Key>, DialectTableError> {
        match self.inner.get_by_id(id).await? {
            Some(row) => S::Key::from_row(&row).map(Some),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// See [`DialectTable::insert_row`].
    pub async fn insert_row(&mut self, key: &S::Key) -> Result<Option<RowId>, DialectTableError> {
        self.inner.insert_row(&key.to_params()).await
    }

    /// # Errors
    ///
    /// See [`DialectTable::update_row`].
    pub async fn update_row(
        &mut self,
        id: RowId,
        key: &S::Key,
    ) -> Result<usize, DialectTableError> {
        self.inner.update_row(id, &key.to_params()).await
    }

    /// # Errors
    ///
    /// See [`DialectTable::delete_row`].
    pub async fn delete_row(&mut self, id: RowId) -> Result<usize, DialectTableError> {
        self.inner.delete_row(id).await
    }

    /// # Errors
    ///
    /// See [`DialectTable::create_schema`].
    pub async fn create_schema(&mut self) -> Result<(), DialectTableError> {
        self.inner.create_schema().await
    }

    /// # Errors
    ///
    /// See [`DialectTable::drop_schema`].
    pub async fn drop_schema(&mut self) -> Result<(), DialectTableError> {
        self.inner.drop_schema().await
    }
}

/// Key of [`LabelTable`]: a single text value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub String);

impl Label {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl KeyTuple for Label {
    const ARITY: usize = 1;

    fn to_params(&self) -> Vec<RowValues> {
        vec![RowValues::Text(self.0.clone())]
    }

    fn from_row(row: &CustomDbRow) -> Result<Self, DialectTableError> {
        match row.get_by_index(0) {
            Some(RowValues::Text(label)) => Ok(Label(label.clone())),
            other => Err(DialectTableError::ExecutionError(format!(
                "expected a text label, got {other:?}"
            ))),
        }
    }
}

/// `labels (id, label)` with an index on `label`.
///
/// `select_by_id` returns only the `label` column, so a fetched row decodes straight into a
/// [`Label`].
pub struct LabelTable;

impl TableSpec for LabelTable {
    type Key = Label;

    fn statements(dialect: Dialect) -> DialectStatements {
        match dialect {
            Dialect::Sqlite => DialectStatements::Sqlite(Statements {
                select_by_key: "SELECT id FROM labels WHERE label = ?1".into(),
                insert: "INSERT INTO labels (label) VALUES (?1)".into(),
                select_by_id: "SELECT label FROM labels WHERE id = ?1".into(),
                update: "UPDATE labels SET label = ?1 WHERE id = ?2".into(),
                delete: "DELETE FROM labels WHERE id = ?1".into(),
                create_schema: vec![
                    "CREATE TABLE IF NOT EXISTS labels \
                     (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT)"
                        .into(),
                    "CREATE INDEX IF NOT EXISTS labels_idx ON labels(label)".into(),
                ],
                drop_schema: vec![
                    "DROP INDEX IF EXISTS labels_idx".into(),
                    "DROP TABLE IF EXISTS labels".into(),
                ],
            }),
            Dialect::Postgres => DialectStatements::Postgres {
                statements: Statements {
                    select_by_key: "SELECT id FROM labels WHERE label = $1".into(),
                    insert: "INSERT INTO labels (label) VALUES ($1)".into(),
                    select_by_id: "SELECT label FROM labels WHERE id = $1".into(),
                    update: "UPDATE labels SET label = $1 WHERE id = $2".into(),
                    delete: "DELETE FROM labels WHERE id = $1".into(),
                    create_schema: vec![
                        "CREATE SEQUENCE IF NOT EXISTS labels_seq".into(),
                        "CREATE TABLE IF NOT EXISTS labels \
                         (id INTEGER PRIMARY KEY NOT NULL DEFAULT NEXTVAL('labels_seq'), \
                         label TEXT)"
                            .into(),
                        "CREATE INDEX IF NOT EXISTS labels_idx ON labels(label)".into(),
                    ],
                    drop_schema: vec![
                        "DROP INDEX IF EXISTS labels_idx".into(),
                        "DROP TABLE IF EXISTS labels".into(),
                        "DROP SEQUENCE IF EXISTS labels_seq".into(),
                    ],
                },
                current_value: "SELECT CURRVAL('labels_seq')".into(),
            },
        }
    }
}
