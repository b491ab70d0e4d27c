//! rr-db - Engine abstraction layer for regrun
//!
//! This crate provides the `Engine`/`Session` traits consumed by the
//! harness and a DuckDB implementation.

pub mod duckdb;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use crate::duckdb::{DuckDbEngine, DuckDbSession};
pub use error::{DbError, DbResult};
pub use traits::{Disposition, Engine, RowSet, Session};
