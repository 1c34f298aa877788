/// Embedded `PostgreSQL` for integration tests
pub mod postgres;

pub use postgres::*;
