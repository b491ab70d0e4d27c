//! Conformance reports: per-statement records, failures, totals, and
//! comparison between two saved runs.

use chrono::{DateTime, Utc};
use rr_core::error::CoreResult;
use rr_core::fixture::{Expectation, FixtureDefinition, StatementCase};
use rr_core::status::{FixtureStatus, StatementStatus};
use rr_core::value::Row;
use rr_db::{DbResult, RowSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// An expected or observed statement result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Rows(Vec<Row>),
    Error(String),
    NotRun,
}

impl Outcome {
    /// What a statement declares it should produce
    pub fn expected(expectation: &Expectation) -> Self {
        match expectation {
            Expectation::Success => Outcome::Success,
            Expectation::Rows(rows) => Outcome::Rows(rows.clone()),
            Expectation::Error(substring) => Outcome::Error(substring.clone()),
        }
    }

    /// What the engine produced. Rows are kept only when the statement
    /// declared rows; otherwise success is recorded without payload.
    pub fn actual(expectation: &Expectation, result: &DbResult<RowSet>) -> Self {
        match (result, expectation) {
            (Ok(set), Expectation::Rows(_)) => Outcome::Rows(set.rows.clone()),
            (Ok(_), _) => Outcome::Success,
            (Err(e), _) => Outcome::Error(e.message()),
        }
    }
}

/// A structured verification or execution failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub fixture: String,
    /// `None` for fixture-level failures such as a session that could not
    /// be opened
    pub statement_index: Option<usize>,
    pub sql: String,
    pub expected: Outcome,
    pub actual: Outcome,
    pub reason: String,
}

/// Result of one statement within a fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRecord {
    pub index: usize,
    pub sql: String,
    pub status: StatementStatus,
    pub expected: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<Outcome>,
}

impl StatementRecord {
    pub(crate) fn new(
        index: usize,
        case: &StatementCase,
        status: StatementStatus,
        actual: Option<Outcome>,
    ) -> Self {
        Self {
            index,
            sql: case.sql.clone(),
            status,
            expected: Outcome::expected(&case.expectation),
            actual,
        }
    }
}

/// Health of one fixture in a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureReport {
    pub name: String,
    pub status: FixtureStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    pub duration_ms: u64,
    pub statements: Vec<StatementRecord>,
    pub failures: Vec<Failure>,
    pub pass_ids: Vec<usize>,
    pub skip_ids: Vec<usize>,
    pub fail_ids: Vec<usize>,
}

impl FixtureReport {
    /// Build a report from statement records, deriving the id lists
    pub fn new(
        name: &str,
        status: FixtureStatus,
        statements: Vec<StatementRecord>,
        failures: Vec<Failure>,
        duration_ms: u64,
    ) -> Self {
        let ids = |wanted: &[StatementStatus]| -> Vec<usize> {
            statements
                .iter()
                .filter(|s| wanted.contains(&s.status))
                .map(|s| s.index)
                .collect()
        };
        let pass_ids = ids(&[StatementStatus::Passed]);
        let skip_ids = ids(&[StatementStatus::Skipped, StatementStatus::Unsupported]);
        let fail_ids = ids(&[StatementStatus::Failed]);
        Self {
            name: name.to_string(),
            status,
            skip_reason: None,
            duration_ms,
            statements,
            failures,
            pass_ids,
            skip_ids,
            fail_ids,
        }
    }

    /// A fixture whose statements were never sent to the engine
    pub fn not_run(
        def: &FixtureDefinition,
        status: FixtureStatus,
        failures: Vec<Failure>,
    ) -> Self {
        let statements = def
            .statements
            .iter()
            .enumerate()
            .map(|(i, case)| StatementRecord::new(i, case, StatementStatus::NotRun, None))
            .collect();
        Self::new(def.name.as_str(), status, statements, failures, 0)
    }

    /// A fixture skipped before it started
    pub fn skipped(def: &FixtureDefinition, reason: impl Into<String>) -> Self {
        let mut report = Self::not_run(def, FixtureStatus::Skipped, Vec::new());
        report.skip_reason = Some(reason.into());
        report
    }
}

/// Per-status fixture counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FixtureCounts {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Aggregated result of one conformance run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub engine: String,
    /// Fixtures requested by the caller
    pub roots: Vec<String>,
    /// Every fixture in execution order, dependencies included
    pub fixtures: Vec<FixtureReport>,
}

impl Report {
    pub fn new(
        engine: &str,
        roots: Vec<String>,
        started_at: DateTime<Utc>,
        duration_ms: u64,
        fixtures: Vec<FixtureReport>,
    ) -> Self {
        Self {
            run_id: short_run_id(),
            started_at,
            duration_ms,
            engine: engine.to_string(),
            roots,
            fixtures,
        }
    }

    /// Look up a fixture's report by name
    pub fn fixture(&self, name: &str) -> Option<&FixtureReport> {
        self.fixtures.iter().find(|f| f.name == name)
    }

    /// Status of a fixture in this run
    pub fn status_of(&self, name: &str) -> Option<FixtureStatus> {
        self.fixture(name).map(|f| f.status)
    }

    /// `(pass, skip, fail)` statement totals across every fixture.
    /// Unsupported statements count as skips; not-run statements count in
    /// none.
    pub fn totals(&self) -> (usize, usize, usize) {
        self.fixtures.iter().fold((0, 0, 0), |(p, s, f), fx| {
            (
                p + fx.pass_ids.len(),
                s + fx.skip_ids.len(),
                f + fx.fail_ids.len(),
            )
        })
    }

    /// Number of fixtures in each terminal status
    pub fn fixture_counts(&self) -> FixtureCounts {
        let mut counts = FixtureCounts::default();
        for fx in &self.fixtures {
            match fx.status {
                FixtureStatus::Passed => counts.passed += 1,
                FixtureStatus::Failed => counts.failed += 1,
                FixtureStatus::Skipped => counts.skipped += 1,
                FixtureStatus::Pending | FixtureStatus::Running => {}
            }
        }
        counts
    }

    /// Every failure in execution order
    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.fixtures.iter().flat_map(|f| f.failures.iter())
    }

    /// The pass/fail signal: every fixture in the run passed
    pub fn all_passed(&self) -> bool {
        self.fixtures
            .iter()
            .all(|f| f.status == FixtureStatus::Passed)
    }

    /// Load a report from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the report to a file path atomically
    ///
    /// Uses write-to-temp-then-rename pattern to prevent corruption
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

fn short_run_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// A statement whose outcome changed between two runs
#[derive(Debug, Clone, PartialEq)]
pub struct StatementChange {
    pub fixture: String,
    pub index: usize,
    pub sql: String,
    /// Status in the later run
    pub status: StatementStatus,
    pub expected: Outcome,
    /// What the engine produced in the later run
    pub actual: Option<Outcome>,
}

/// Statement-level comparison of two reports
#[derive(Debug, Clone, Default)]
pub struct ReportDiff {
    pub from_totals: (usize, usize, usize),
    pub to_totals: (usize, usize, usize),
    /// Failing in `to` but not in `from`, or passing in `from` and no
    /// longer run in `to`
    pub regressions: Vec<StatementChange>,
    /// Passing in `to` but not in `from`
    pub progressions: Vec<StatementChange>,
}

impl ReportDiff {
    /// Compare statements keyed by fixture name, index, and SQL text.
    ///
    /// A statement with no counterpart in `from` (new fixture, edited SQL)
    /// is compared as if it had never passed or failed.
    pub fn between(from: &Report, to: &Report) -> Self {
        let before: HashMap<(&str, usize, &str), StatementStatus> = from
            .fixtures
            .iter()
            .flat_map(|fx| {
                fx.statements
                    .iter()
                    .map(move |s| ((fx.name.as_str(), s.index, s.sql.as_str()), s.status))
            })
            .collect();

        let mut diff = ReportDiff {
            from_totals: from.totals(),
            to_totals: to.totals(),
            ..Default::default()
        };

        for fx in &to.fixtures {
            for stmt in &fx.statements {
                let key = (fx.name.as_str(), stmt.index, stmt.sql.as_str());
                let previous = before.get(&key).copied();
                let change = || StatementChange {
                    fixture: fx.name.clone(),
                    index: stmt.index,
                    sql: stmt.sql.clone(),
                    status: stmt.status,
                    expected: stmt.expected.clone(),
                    actual: stmt.actual.clone(),
                };
                if is_regression(previous, stmt.status) {
                    diff.regressions.push(change());
                } else if is_progression(previous, stmt.status) {
                    diff.progressions.push(change());
                }
            }
        }
        diff
    }

    /// Whether nothing regressed
    pub fn is_clean(&self) -> bool {
        self.regressions.is_empty()
    }

    /// Render as markdown for a pull-request comment
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let (from_pass, from_skip, from_fail) = self.from_totals;
        let (to_pass, to_skip, to_fail) = self.to_totals;
        let _ = writeln!(out, "|   | Before | After |");
        let _ = writeln!(out, "| --- | --- | --- |");
        let _ = writeln!(out, "| Passed | {} | {} |", from_pass, to_pass);
        let _ = writeln!(out, "| Skipped | {} | {} |", from_skip, to_skip);
        let _ = writeln!(out, "| Failed | {} | {} |", from_fail, to_fail);

        write_changes(&mut out, "Regressions", &self.regressions, true);
        write_changes(&mut out, "Progressions", &self.progressions, false);
        out
    }
}

fn is_regression(previous: Option<StatementStatus>, current: StatementStatus) -> bool {
    match current {
        StatementStatus::Failed => previous != Some(StatementStatus::Failed),
        StatementStatus::NotRun => previous == Some(StatementStatus::Passed),
        _ => false,
    }
}

fn is_progression(previous: Option<StatementStatus>, current: StatementStatus) -> bool {
    current == StatementStatus::Passed && previous != Some(StatementStatus::Passed)
}

fn write_changes(out: &mut String, title: &str, changes: &[StatementChange], detail: bool) {
    if changes.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n## {} ({})", title, changes.len());
    let mut current: Option<&str> = None;
    for change in changes {
        if current != Some(change.fixture.as_str()) {
            let _ = writeln!(out, "### {}", change.fixture);
            current = Some(change.fixture.as_str());
        }
        let _ = writeln!(out, "```");
        let _ = writeln!(out, "QUERY:    [{}] {}", change.index, change.sql);
        if detail {
            if change.status == StatementStatus::NotRun {
                let _ = writeln!(out, "STATUS:   not run");
            }
            let _ = writeln!(out, "EXPECTED: {}", describe(&change.expected));
            if let Some(actual) = &change.actual {
                let _ = writeln!(out, "ACTUAL:   {}", describe(actual));
            }
        }
        let _ = writeln!(out, "```");
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success => "success".to_string(),
        Outcome::NotRun => "not run".to_string(),
        Outcome::Error(msg) => format!("error: {}", msg),
        Outcome::Rows(rows) => {
            let rendered: Vec<String> = rows
                .iter()
                .map(|r| {
                    let cells: Vec<String> = r.iter().map(|v| v.to_string()).collect();
                    format!("({})", cells.join(", "))
                })
                .collect();
            format!("{} row(s) {}", rows.len(), rendered.join(" "))
        }
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
