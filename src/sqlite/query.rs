use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Statement, params_from_iter};

use crate::error::DialectTableError;
use crate::results::CustomDbRow;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `DialectTableError::SqliteError` if the column cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, DialectTableError> {
    let value: Value = row.get(idx)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(s)),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

/// Run a prepared query and keep only its first row.
///
/// # Errors
///
/// Returns `DialectTableError::SqliteError` if execution or extraction fails.
pub fn build_first_row(
    stmt: &mut Statement,
    params: &[Value],
) -> Result<Option<CustomDbRow>, DialectTableError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut rows_iter = stmt.query(params_from_iter(params.iter()))?;
    let Some(row) = rows_iter.next()? else {
        return Ok(None);
    };

    let mut row_values = Vec::with_capacity(col_count);
    for i in 0..col_count {
        row_values.push(sqlite_extract_value_sync(row, i)?);
    }

    Ok(Some(CustomDbRow::new(Arc::new(column_names), row_values)))
}
