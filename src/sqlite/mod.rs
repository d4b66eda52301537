// SQLite backend
//
// - connection: session open/close and the blocking-pool bridge
// - params: conversion from `RowValues` to rusqlite values
// - query: result extraction and building
// - executor: statement, batch, and read execution

pub mod connection;
pub mod executor;
pub mod params;
pub mod query;

pub use connection::SqliteSession;
pub use params::Params;
pub use query::build_result_set;
