//! sm-db - Database abstraction layer for Stratum
//!
//! This crate provides the `Database` trait assumed by the migration engine,
//! the DuckDB implementation, and a scriptable mock for unit tests.

pub mod duckdb;
pub mod error;
pub mod mock;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use mock::MockDb;
pub use traits::Database;
