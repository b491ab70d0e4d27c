//! Fixture definitions: named, ordered SQL statements with golden expectations.

use crate::error::{CoreError, CoreResult};
use crate::fixture_name::FixtureName;
use crate::value::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// What a statement is expected to produce
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Expectation {
    /// The statement must simply succeed; any rows are ignored
    #[default]
    Success,
    /// The statement must return exactly these rows, in this order
    Rows(Vec<Row>),
    /// The statement must fail with a message containing this text
    Error(String),
}

impl Expectation {
    /// Whether an error from this statement aborts the fixture
    pub fn aborts_on_error(&self) -> bool {
        matches!(self, Expectation::Success)
    }
}

/// How a statement is handled by the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Plain SQL sent to the engine
    #[default]
    Sql,
    /// Interactive-client meta output (`\d+ tbl` and friends). Never sent to
    /// the engine; recorded as unsupported.
    MetaCommand,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Sql => write!(f, "sql"),
            StatementKind::MetaCommand => write!(f, "meta_command"),
        }
    }
}

/// One statement of a fixture with its golden expectation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawStatementCase")]
pub struct StatementCase {
    pub sql: String,
    pub expectation: Expectation,
    pub kind: StatementKind,
    /// Never executed; recorded as skipped
    pub skip: bool,
    /// Compare rows by decoded value; `false` requires type-exact cells
    pub normalize: bool,
}

impl StatementCase {
    /// A statement that must succeed
    pub fn ok(sql: impl Into<String>) -> Self {
        Self::with_expectation(sql, Expectation::Success)
    }

    /// A statement that must return exactly `rows`
    pub fn rows(sql: impl Into<String>, rows: Vec<Row>) -> Self {
        Self::with_expectation(sql, Expectation::Rows(rows))
    }

    /// A statement that must fail with an error containing `substring`
    pub fn error(sql: impl Into<String>, substring: impl Into<String>) -> Self {
        Self::with_expectation(sql, Expectation::Error(substring.into()))
    }

    fn with_expectation(sql: impl Into<String>, expectation: Expectation) -> Self {
        let sql = sql.into();
        let kind = classify(&sql);
        Self {
            sql,
            expectation,
            kind,
            skip: false,
            normalize: true,
        }
    }

    /// Mark this statement as skipped
    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Require type-exact cell values for this statement
    pub fn strict(mut self) -> Self {
        self.normalize = false;
        self
    }

    /// Whether the executor should send this statement to the engine
    pub fn is_executable(&self) -> bool {
        !self.skip && self.kind == StatementKind::Sql
    }
}

/// Classify statement text by the psql convention: a leading backslash is a
/// client meta-command.
pub fn classify(sql: &str) -> StatementKind {
    if sql.trim_start().starts_with('\\') {
        StatementKind::MetaCommand
    } else {
        StatementKind::Sql
    }
}

/// Externalized statement form used by fixture files
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStatementCase {
    sql: String,
    #[serde(default)]
    rows: Option<Vec<Row>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    kind: Option<StatementKind>,
    #[serde(default)]
    skip: bool,
    #[serde(default = "default_normalize")]
    normalize: bool,
}

fn default_normalize() -> bool {
    true
}

impl TryFrom<RawStatementCase> for StatementCase {
    type Error = String;

    fn try_from(raw: RawStatementCase) -> Result<Self, Self::Error> {
        let expectation = match (raw.rows, raw.error) {
            (Some(_), Some(_)) => {
                return Err("a statement cannot declare both `rows` and `error`".to_string())
            }
            (Some(rows), None) => Expectation::Rows(rows),
            (None, Some(err)) if err.is_empty() => {
                return Err("`error` must not be empty".to_string())
            }
            (None, Some(err)) => Expectation::Error(err),
            (None, None) => Expectation::Success,
        };
        let kind = raw.kind.unwrap_or_else(|| classify(&raw.sql));
        Ok(Self {
            sql: raw.sql,
            expectation,
            kind,
            skip: raw.skip,
            normalize: raw.normalize,
        })
    }
}

/// A named, ordered list of statements plus the fixtures that must run first.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureDefinition {
    pub name: FixtureName,
    #[serde(default)]
    pub depends_on: Vec<FixtureName>,
    #[serde(default)]
    pub statements: Vec<StatementCase>,
}

impl FixtureDefinition {
    /// Build a definition, validating its dependency list
    pub fn new(
        name: impl Into<String>,
        depends_on: &[&str],
        statements: Vec<StatementCase>,
    ) -> CoreResult<Self> {
        let name = FixtureName::try_new(name).ok_or_else(|| CoreError::EmptyName {
            context: "fixture name".into(),
        })?;
        let mut deps = Vec::with_capacity(depends_on.len());
        for dep in depends_on {
            let dep = FixtureName::try_new(*dep).ok_or_else(|| CoreError::EmptyName {
                context: format!("dependency of fixture '{}'", name),
            })?;
            deps.push(dep);
        }
        let def = Self {
            name,
            depends_on: deps,
            statements,
        };
        def.validate()?;
        Ok(def)
    }

    /// Check the invariants a registry relies on: no self-reference, no
    /// repeated dependency, and no statement that can never be judged.
    pub fn validate(&self) -> CoreResult<()> {
        for (index, case) in self.statements.iter().enumerate() {
            let reason = if case.sql.trim().is_empty() {
                "statement text is empty"
            } else if matches!(&case.expectation, Expectation::Error(s) if s.is_empty()) {
                "expected error substring is empty"
            } else {
                continue;
            };
            return Err(CoreError::InvalidStatement {
                fixture: self.name.to_string(),
                index,
                reason: reason.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for dep in &self.depends_on {
            if *dep == self.name {
                return Err(CoreError::SelfDependency {
                    name: self.name.to_string(),
                });
            }
            if !seen.insert(dep.as_str()) {
                return Err(CoreError::DuplicateDependency {
                    fixture: self.name.to_string(),
                    dependency: dep.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Number of statements that will be sent to the engine
    pub fn executable_count(&self) -> usize {
        self.statements.iter().filter(|s| s.is_executable()).count()
    }
}

#[cfg(test)]
#[path = "fixture_test.rs"]
mod tests;
