// PostgreSQL backend
//
// - config: mapping `ConnectionConfig` onto driver settings
// - connection: session open/close
// - params: conversion between `RowValues` and Postgres types
// - query: result extraction and building
// - executor: statement, batch, and read execution

pub mod config;
pub mod connection;
pub mod executor;
pub mod params;
pub mod query;

pub use connection::PostgresSession;
pub use params::Params;
pub use query::build_result_set_from_statement;
