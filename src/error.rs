use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialectTableError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    #[error("{operation} expects {expected} key values, got {actual}")]
    Arity {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{operation} is not allowed on a read-only table")]
    ReadOnlyViolation { operation: &'static str },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),
}
