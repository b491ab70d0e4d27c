//! Conformance run orchestration

use crate::executor::{SessionGuard, StatementExecutor};
use crate::report::{Failure, FixtureReport, Outcome, Report};
use chrono::Utc;
use rr_core::error::{CoreError, CoreResult};
use rr_core::fixture_name::FixtureName;
use rr_core::registry::FixtureRegistry;
use rr_core::resolver::resolve_all;
use rr_core::status::FixtureStatus;
use rr_db::{Disposition, Engine};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Run-level options
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Fixtures not started before this instant are skipped; a fixture in
    /// progress stops before its next statement.
    pub deadline: Option<Instant>,
}

impl RunOptions {
    /// Options with a deadline `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Per-run fixture status book. Enforces the lifecycle transitions and
/// memoizes terminal outcomes by name.
#[derive(Debug, Default)]
struct StatusBook {
    statuses: HashMap<FixtureName, FixtureStatus>,
}

impl StatusBook {
    fn status(&self, name: &str) -> FixtureStatus {
        self.statuses.get(name).copied().unwrap_or_default()
    }

    fn transition(&mut self, name: &FixtureName, next: FixtureStatus) -> CoreResult<()> {
        let current = self.status(name);
        if !current.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                name: name.to_string(),
                from: current.to_string(),
                to: next.to_string(),
            });
        }
        log::debug!("Fixture '{}': {} -> {}", name, current, next);
        self.statuses.insert(name.clone(), next);
        Ok(())
    }
}

/// Drives a conformance run over a registry against one engine
pub struct ConformanceRunner<'a> {
    registry: &'a FixtureRegistry,
    engine: &'a dyn Engine,
    options: RunOptions,
}

impl<'a> ConformanceRunner<'a> {
    /// Create a new runner with default options
    pub fn new(registry: &'a FixtureRegistry, engine: &'a dyn Engine) -> Self {
        Self {
            registry,
            engine,
            options: RunOptions::default(),
        }
    }

    /// Replace the run options
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Run `root` and its transitive dependencies.
    ///
    /// Configuration errors (unknown fixture, cycle) abort before any SQL
    /// is sent. Everything else is accumulated into the report, which covers
    /// every fixture in the resolved order.
    pub async fn run_tests(&self, root: &str) -> CoreResult<Report> {
        self.run_many(&[root]).await
    }

    /// Run several roots sharing one status book, so a fixture reached from
    /// more than one root runs once.
    pub async fn run_many(&self, roots: &[&str]) -> CoreResult<Report> {
        let started_at = Utc::now();
        let start = Instant::now();

        let order = resolve_all(self.registry, roots)?;
        log::info!(
            "Running {} fixtures on {} for {}",
            order.len(),
            self.engine.engine_name(),
            roots.join(", ")
        );

        let mut book = StatusBook::default();
        let mut fixtures = Vec::with_capacity(order.len());
        for name in &order {
            if book.status(name).is_terminal() {
                continue;
            }
            fixtures.push(self.run_fixture(name, &mut book).await?);
        }

        Ok(Report::new(
            self.engine.engine_name(),
            roots.iter().map(|r| r.to_string()).collect(),
            started_at,
            start.elapsed().as_millis() as u64,
            fixtures,
        ))
    }

    async fn run_fixture(
        &self,
        name: &FixtureName,
        book: &mut StatusBook,
    ) -> CoreResult<FixtureReport> {
        let def = self.registry.lookup(name)?;

        let blocked = def
            .depends_on
            .iter()
            .map(|dep| (dep, book.status(dep)))
            .find(|(_, status)| status.blocks_dependents());
        if let Some((dep, status)) = blocked {
            book.transition(name, FixtureStatus::Skipped)?;
            log::info!("Skipped '{}': dependency '{}' {}", name, dep, status);
            return Ok(FixtureReport::skipped(
                def,
                format!("dependency '{}' {}", dep, status),
            ));
        }

        if self.options.expired() {
            book.transition(name, FixtureStatus::Skipped)?;
            log::info!("Skipped '{}': deadline exceeded", name);
            return Ok(FixtureReport::skipped(def, "deadline exceeded"));
        }

        book.transition(name, FixtureStatus::Running)?;
        log::info!("Running '{}'", name);
        let start = Instant::now();

        let mut guard = match SessionGuard::open(self.engine).await {
            Ok(guard) => guard,
            Err(e) => {
                book.transition(name, FixtureStatus::Failed)?;
                log::info!("Failed '{}': could not open session: {}", name, e);
                let failure = Failure {
                    fixture: name.to_string(),
                    statement_index: None,
                    sql: String::new(),
                    expected: Outcome::Success,
                    actual: Outcome::Error(e.message()),
                    reason: format!("could not open session: {}", e),
                };
                return Ok(FixtureReport::not_run(def, FixtureStatus::Failed, vec![failure]));
            }
        };

        let execution =
            StatementExecutor::run_fixture(&mut guard, def, self.options.deadline).await;
        let (status, disposition) = if execution.passed() {
            (FixtureStatus::Passed, Disposition::Commit)
        } else {
            (FixtureStatus::Failed, Disposition::Rollback)
        };
        guard.finish(disposition);
        book.transition(name, status)?;

        let duration_ms = start.elapsed().as_millis() as u64;
        log::info!(
            "Finished '{}': {} ({} failures, {}ms)",
            name,
            status,
            execution.failures.len(),
            duration_ms
        );

        Ok(FixtureReport::new(
            name.as_str(),
            status,
            execution.statements,
            execution.failures,
            duration_ms,
        ))
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
