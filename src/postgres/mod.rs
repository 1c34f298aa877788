// PostgreSQL module - the client/server dialect
//
// - params: `ToSql` for `RowValues`
// - query: row extraction
// - handle: `DbHandle` for `tokio_postgres::Client`
// - config: connection helper

pub mod config;
pub mod handle;
pub mod params;
pub mod query;

pub use config::connect;
pub use params::{Params, check_int_widths};
pub use query::{build_first_row, postgres_extract_value};
