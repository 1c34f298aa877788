//! Convenient imports for common functionality.

pub use crate::error::DialectTableError;
pub use crate::handle::DbHandle;
pub use crate::results::CustomDbRow;
pub use crate::statements::{DialectStatements, IdRecovery, Statements, TableConfig};
pub use crate::table::{DialectTable, DialectTableBuilder, TableOptions};
pub use crate::typed::{KeyTuple, Label, LabelTable, TableSpec, TypedTable};
pub use crate::types::{Dialect, RowId, RowValues};

#[cfg(feature = "postgres")]
pub use crate::postgres::connect as postgres_connect;
