use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::DialectTableError;

/// Backend-assigned primary key of a row.
pub type RowId = i64;

/// Values bound as statement parameters or fetched from a row.
///
/// The same enum is used for both dialects so key tuples never branch on driver types:
/// ```rust
/// use dialect_table::prelude::*;
///
/// let key = vec![RowValues::Text("alpha".into()), RowValues::Int(7)];
/// # let _ = key;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

/// The SQL dialect a table talks to.
///
/// Each dialect differs in statement syntax and in how a freshly generated primary key is
/// recovered after an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `SQLite`: embedded, file based, rowid per connection
    Sqlite,
    /// `PostgreSQL`: client/server, session-scoped sequences
    Postgres,
}

impl Dialect {
    /// Every dialect this crate knows how to drive.
    pub const ALL: [Dialect; 2] = [Dialect::Sqlite, Dialect::Postgres];

    /// Tag used when reporting the dialect.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Dialect::Sqlite => "SQLite3",
            Dialect::Postgres => "PG",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Dialect {
    type Err = DialectTableError;

    /// Accepts the short tags (`SQLite3`, `PG`) as well as the engine names, ignoring case.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sqlite3" | "sqlite" => Ok(Dialect::Sqlite),
            "pg" | "postgres" | "postgresql" => Ok(Dialect::Postgres),
            _ => Err(DialectTableError::UnsupportedDialect(tag.to_string())),
        }
    }
}
