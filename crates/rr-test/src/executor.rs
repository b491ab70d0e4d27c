//! Statement execution on a single fixture session

use crate::report::{Failure, Outcome, StatementRecord};
use crate::verifier;
use rr_core::fixture::{FixtureDefinition, StatementCase, StatementKind};
use rr_core::status::StatementStatus;
use rr_db::{DbError, DbResult, Disposition, Engine, RowSet, Session};
use std::time::Instant;

/// Scoped owner of one engine session.
///
/// The session is released exactly once: through [`finish`](Self::finish)
/// on normal completion, or with a rollback when the guard is dropped
/// without finishing (early return or panic unwind).
pub struct SessionGuard {
    session: Option<Box<dyn Session>>,
}

impl SessionGuard {
    /// Open a fresh session on `engine`
    pub async fn open(engine: &dyn Engine) -> DbResult<Self> {
        Ok(Self::new(engine.open_session().await?))
    }

    /// Take ownership of an already opened session
    pub fn new(session: Box<dyn Session>) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// The live session
    pub fn session(&mut self) -> DbResult<&mut dyn Session> {
        match self.session.as_mut() {
            Some(session) => Ok(session.as_mut()),
            None => Err(DbError::SessionClosed),
        }
    }

    /// Release the session with the given disposition
    pub fn finish(mut self, disposition: Disposition) {
        if let Some(session) = self.session.take() {
            session.release(disposition);
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            log::warn!("Session dropped without finishing, rolling back");
            session.release(Disposition::Rollback);
        }
    }
}

/// Statement and failure records for one fixture's statements
#[derive(Debug, Default)]
pub struct FixtureExecution {
    pub statements: Vec<StatementRecord>,
    pub failures: Vec<Failure>,
    /// Set when a statement error or the deadline stopped the fixture early
    pub aborted: bool,
}

impl FixtureExecution {
    /// Whether every executed statement verified
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs statements against a session, one at a time, in declared order
pub struct StatementExecutor;

impl StatementExecutor {
    /// Submit one statement. Returns rows or an error, never both.
    pub async fn run(session: &mut dyn Session, case: &StatementCase) -> DbResult<RowSet> {
        log::debug!("Executing: {}", case.sql);
        session.execute(&case.sql).await
    }

    /// Run every statement of `def` on the guarded session.
    ///
    /// Skipped and meta-command statements are recorded without reaching the
    /// engine. An error from a statement that only had to succeed aborts the
    /// fixture; the remaining statements are recorded as not run. Any other
    /// mismatch is recorded and execution continues. `deadline` is checked
    /// before each statement sent to the engine.
    pub async fn run_fixture(
        guard: &mut SessionGuard,
        def: &FixtureDefinition,
        deadline: Option<Instant>,
    ) -> FixtureExecution {
        let mut execution = FixtureExecution::default();

        for (index, case) in def.statements.iter().enumerate() {
            if execution.aborted {
                execution
                    .statements
                    .push(StatementRecord::new(index, case, StatementStatus::NotRun, None));
                continue;
            }

            if case.skip {
                log::warn!("Skipping statement {} of '{}': {}", index, def.name, case.sql);
                execution
                    .statements
                    .push(StatementRecord::new(index, case, StatementStatus::Skipped, None));
                continue;
            }

            if case.kind == StatementKind::MetaCommand {
                log::warn!(
                    "Unsupported meta-command in '{}' statement {}: {}",
                    def.name,
                    index,
                    case.sql
                );
                execution.statements.push(StatementRecord::new(
                    index,
                    case,
                    StatementStatus::Unsupported,
                    None,
                ));
                continue;
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                log::warn!("Deadline exceeded in '{}' before statement {}", def.name, index);
                execution.failures.push(Failure {
                    fixture: def.name.to_string(),
                    statement_index: Some(index),
                    sql: case.sql.clone(),
                    expected: Outcome::expected(&case.expectation),
                    actual: Outcome::NotRun,
                    reason: "deadline exceeded".to_string(),
                });
                execution
                    .statements
                    .push(StatementRecord::new(index, case, StatementStatus::NotRun, None));
                execution.aborted = true;
                continue;
            }

            let result = match guard.session() {
                Ok(session) => Self::run(session, case).await,
                Err(e) => Err(e),
            };
            let actual = Outcome::actual(&case.expectation, &result);

            match verifier::verify(case, &result) {
                Ok(()) => {
                    execution.statements.push(StatementRecord::new(
                        index,
                        case,
                        StatementStatus::Passed,
                        Some(actual),
                    ));
                }
                Err(mismatch) => {
                    log::debug!("Statement {} of '{}' failed: {}", index, def.name, mismatch);
                    execution.failures.push(Failure {
                        fixture: def.name.to_string(),
                        statement_index: Some(index),
                        sql: case.sql.clone(),
                        expected: Outcome::expected(&case.expectation),
                        actual: actual.clone(),
                        reason: mismatch.to_string(),
                    });
                    execution.statements.push(StatementRecord::new(
                        index,
                        case,
                        StatementStatus::Failed,
                        Some(actual),
                    ));
                    if result.is_err() && case.expectation.aborts_on_error() {
                        log::warn!(
                            "Aborting '{}' after unexpected error at statement {}",
                            def.name,
                            index
                        );
                        execution.aborted = true;
                    }
                }
            }
        }

        execution
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
