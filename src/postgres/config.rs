use tokio_postgres::{Client, NoTls};

use crate::error::DialectTableError;

/// Open a single Postgres session and drive its connection on the tokio runtime.
///
/// The returned client is the one handle a table should use; sequence current values are
/// scoped to it. Connection failures after startup are logged and surface as errors on the
/// next statement.
///
/// # Errors
/// Returns `DialectTableError::PostgresError` if the connection cannot be established.
pub async fn connect(params: &str) -> Result<Client, DialectTableError> {
    let (client, connection) = tokio_postgres::connect(params, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(error = %e, "postgres connection closed with error");
        }
    });
    Ok(client)
}
