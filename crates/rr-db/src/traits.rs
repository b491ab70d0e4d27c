//! Engine and session traits
//!
//! The harness consumes one capability from the engine under test: execute a
//! statement on a session and get back either rows or an error. Any backend
//! exposing that contract can be substituted.

use crate::error::DbResult;
use async_trait::async_trait;
use rr_core::value::Row;

/// Rows returned by one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Column names, possibly empty for statements without a result set
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RowSet {
    /// Build a row set from rows alone
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            columns: Vec::new(),
            rows,
        }
    }

    /// A result with no rows
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// How a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Commit,
    Rollback,
}

/// An engine under test that hands out sessions
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Open a fresh session. Sessions are never shared across fixtures.
    async fn open_session(&self) -> DbResult<Box<dyn Session>>;

    /// Engine identifier for logging
    fn engine_name(&self) -> &'static str;
}

/// One connection/transaction context on the engine
#[async_trait]
pub trait Session: Send {
    /// Execute one statement. Returns rows or an error, never both.
    async fn execute(&mut self, sql: &str) -> DbResult<RowSet>;

    /// End the session, committing or rolling back any open transaction.
    ///
    /// Called exactly once per session, including on panic unwinds, so
    /// implementations must not panic and must not block on async work.
    fn release(self: Box<Self>, disposition: Disposition);
}
