// SQLite module - the embedded-file dialect
//
// - params: conversion from `RowValues` to rusqlite values
// - query: row extraction
// - handle: `DbHandle` for `rusqlite::Connection`

pub mod handle;
pub mod params;
pub mod query;

pub use params::Params;
pub use query::{build_first_row, sqlite_extract_value_sync};
