//! tm-db - Database abstraction layer for Tidemark
//!
//! This crate provides the `Database` trait the migration runner executes
//! against, the `TargetProvider` trait that hands out one connection per
//! target run, and their DuckDB implementations.

pub mod duckdb;
pub mod error;
pub mod provider;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use provider::{DuckDbProvider, ExistingConnection, TargetProvider};
pub use traits::Database;
