use postgresql_embedded::PostgreSQL;
use tokio_postgres::Client;

use crate::postgres::connect;

/// A running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    pub database_url: String,
}

impl EmbeddedPostgres {
    /// Open a new session on the test database.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established.
    pub async fn client(&self) -> Result<Client, crate::DialectTableError> {
        connect(&self.database_url).await
    }
}

/// Set up and start an embedded `PostgreSQL` instance with a fresh `db_name` database.
///
/// # Errors
/// Returns an error if the binaries cannot be set up, the server does not start, the
/// database cannot be created, or the post-start connectivity check fails.
pub async fn setup_postgres_embedded(
    db_name: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    let mut postgresql = PostgreSQL::default();
    postgresql.setup().await?;
    postgresql.start().await?;

    let settings = postgresql.settings();
    let port = settings.port;
    let database_url = format!(
        "postgres://{}:{}@{}:{port}/{db_name}",
        settings.username, settings.password, settings.host
    );

    postgresql.create_database(db_name).await?;

    let client = connect(&database_url).await?;
    client.execute("SELECT 1", &[]).await?;
    tracing::info!(port, "embedded postgres ready");

    Ok(EmbeddedPostgres {
        postgresql,
        port,
        database_url,
    })
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub async fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    let _ = postgresql.stop().await;
}
