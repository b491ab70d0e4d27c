//! Fixture and statement status values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a fixture within one conformance run.
///
/// `Pending -> Running -> {Passed, Failed}` or `Pending -> Skipped`.
/// Terminal states never change again within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    #[default]
    Pending,
    Running,
    Passed,
    Failed,
    Skipped,
}

impl FixtureStatus {
    /// Whether no further transition is allowed
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            FixtureStatus::Passed | FixtureStatus::Failed | FixtureStatus::Skipped
        )
    }

    /// Whether dependents of a fixture in this state must be skipped
    pub fn blocks_dependents(self) -> bool {
        matches!(self, FixtureStatus::Failed | FixtureStatus::Skipped)
    }

    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: FixtureStatus) -> bool {
        use FixtureStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Pending, Skipped) | (Running, Passed) | (Running, Failed)
        )
    }
}

impl fmt::Display for FixtureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureStatus::Pending => write!(f, "pending"),
            FixtureStatus::Running => write!(f, "running"),
            FixtureStatus::Passed => write!(f, "passed"),
            FixtureStatus::Failed => write!(f, "failed"),
            FixtureStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome of one statement within a fixture run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementStatus {
    Passed,
    Failed,
    /// Declared `skip`
    Skipped,
    /// Meta-command that the harness does not replay
    Unsupported,
    /// Not reached: the fixture aborted or was skipped first
    NotRun,
}

impl fmt::Display for StatementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementStatus::Passed => write!(f, "passed"),
            StatementStatus::Failed => write!(f, "failed"),
            StatementStatus::Skipped => write!(f, "skipped"),
            StatementStatus::Unsupported => write!(f, "unsupported"),
            StatementStatus::NotRun => write!(f, "not_run"),
        }
    }
}
