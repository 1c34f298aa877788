//! Get-or-create, fetch, update and delete over a single table, portable across `SQLite` and
//! `PostgreSQL`.
//!
//! A [`DialectTable`] wraps a caller-owned handle (a `rusqlite::Connection` or a
//! `tokio_postgres::Client`) together with the statements for one dialect, and takes care of
//! recovering the id of freshly inserted rows the way that dialect requires.

pub mod error;
pub mod handle;
pub mod prelude;
pub mod results;
pub mod statements;
pub mod table;
pub mod typed;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::DialectTableError;
pub use handle::DbHandle;
pub use results::CustomDbRow;
pub use statements::{DialectStatements, IdRecovery, Statements, TableConfig};
pub use table::{DialectTable, DialectTableBuilder, TableOptions};
pub use typed::{KeyTuple, Label, LabelTable, TableSpec, TypedTable};
pub use types::{Dialect, RowId, RowValues};
