//! rr-test - Conformance execution for regrun
//!
//! This crate runs resolved fixtures against an engine: statement
//! execution on a scoped session, verification of rows and error text,
//! orchestration with skip propagation, and the resulting report.

pub mod executor;
pub mod report;
pub mod runner;
pub mod verifier;

pub use executor::{FixtureExecution, SessionGuard, StatementExecutor};
pub use report::{
    Failure, FixtureCounts, FixtureReport, Outcome, Report, ReportDiff, StatementChange,
    StatementRecord,
};
pub use runner::{ConformanceRunner, RunOptions};
pub use verifier::{compare_error, compare_rows, compare_rows_strict, verify, Mismatch};
