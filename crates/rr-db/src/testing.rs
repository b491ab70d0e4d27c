//! In-process recording engine for orchestration tests.
//!
//! Every statement that reaches the engine is recorded in order, and every
//! session release is counted with its disposition. Responses are scripted
//! by SQL text; unscripted statements succeed with no rows.

use crate::error::{DbError, DbResult};
use crate::traits::{Disposition, Engine, RowSet, Session};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Journal {
    executed: Vec<String>,
    opened: usize,
    released: Vec<Disposition>,
}

/// Engine that records instead of executing
#[derive(Clone, Default)]
pub struct RecordingEngine {
    responses: Arc<Mutex<HashMap<String, DbResult<RowSet>>>>,
    journal: Arc<Mutex<Journal>>,
    fail_open: Arc<Mutex<Option<String>>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `sql` with these rows
    pub fn respond_rows(&self, sql: &str, rows: RowSet) -> &Self {
        self.lock_responses().insert(sql.to_string(), Ok(rows));
        self
    }

    /// Respond to `sql` with an execution error carrying `message`
    pub fn respond_error(&self, sql: &str, message: &str) -> &Self {
        self.lock_responses().insert(
            sql.to_string(),
            Err(DbError::ExecutionError(message.to_string())),
        );
        self
    }

    /// Make every subsequent `open_session` fail
    pub fn fail_open_session(&self, message: &str) {
        *self.fail_open.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
    }

    /// Statements received so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.lock_journal().executed.clone()
    }

    /// Number of sessions opened
    pub fn sessions_opened(&self) -> usize {
        self.lock_journal().opened
    }

    /// Dispositions of released sessions, in release order
    pub fn releases(&self) -> Vec<Disposition> {
        self.lock_journal().released.clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, HashMap<String, DbResult<RowSet>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_journal(&self) -> std::sync::MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Engine for RecordingEngine {
    async fn open_session(&self) -> DbResult<Box<dyn Session>> {
        if let Some(message) = self
            .fail_open
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(DbError::ConnectionError(message));
        }
        self.lock_journal().opened += 1;
        Ok(Box::new(RecordingSession {
            engine: self.clone(),
        }))
    }

    fn engine_name(&self) -> &'static str {
        "recording"
    }
}

struct RecordingSession {
    engine: RecordingEngine,
}

#[async_trait]
impl Session for RecordingSession {
    async fn execute(&mut self, sql: &str) -> DbResult<RowSet> {
        self.engine.lock_journal().executed.push(sql.to_string());
        self.engine
            .lock_responses()
            .get(sql)
            .cloned()
            .unwrap_or_else(|| Ok(RowSet::empty()))
    }

    fn release(self: Box<Self>, disposition: Disposition) {
        self.engine.lock_journal().released.push(disposition);
    }
}
