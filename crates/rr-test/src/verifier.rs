//! Judging engine output against golden expectations.
//!
//! Row order is significant: the verifier never re-sorts, so any intended
//! ordering must come from the SQL itself. Value equality follows
//! [`rr_core::value::Value`]'s rules (NULL equals the empty sentinel,
//! numbers compare by decoded value), unless a statement disables
//! normalization, in which case cells must also match in type.

use rr_core::fixture::{Expectation, StatementCase};
use rr_core::value::{Row, Value};
use rr_db::{DbResult, RowSet};
use thiserror::Error;

/// Why a statement failed verification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Mismatch {
    #[error("expected {expected} rows, got {actual}")]
    RowCount { expected: usize, actual: usize },

    #[error("row {row}: expected {expected} columns, got {actual}")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "row {row}, column {column}: expected {expected} ({}), got {actual} ({})",
        .expected.type_name(),
        .actual.type_name()
    )]
    Value {
        row: usize,
        column: usize,
        expected: Value,
        actual: Value,
    },

    #[error("expected an error containing '{expected_substring}', but the statement succeeded")]
    UnexpectedSuccess { expected_substring: String },

    #[error("expected an error containing '{expected_substring}', got '{actual_message}'")]
    MissingSubstring {
        expected_substring: String,
        actual_message: String,
    },

    #[error("unexpected error: {message}")]
    UnexpectedError { message: String },
}

/// Compare actual rows against expected rows.
///
/// Passes only when the row counts match, each row has the expected number
/// of columns, and every cell is equal. The first difference is reported.
pub fn compare_rows(actual: &[Row], expected: &[Row]) -> Result<(), Mismatch> {
    compare_rows_with(actual, expected, |got, want| got == want)
}

/// Like [`compare_rows`], but cells must carry the same type as well as the
/// same value.
pub fn compare_rows_strict(actual: &[Row], expected: &[Row]) -> Result<(), Mismatch> {
    compare_rows_with(actual, expected, Value::strict_eq)
}

fn compare_rows_with(
    actual: &[Row],
    expected: &[Row],
    cell_eq: impl Fn(&Value, &Value) -> bool,
) -> Result<(), Mismatch> {
    if actual.len() != expected.len() {
        return Err(Mismatch::RowCount {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (row, (got, want)) in actual.iter().zip(expected).enumerate() {
        if got.len() != want.len() {
            return Err(Mismatch::ColumnCount {
                row,
                expected: want.len(),
                actual: got.len(),
            });
        }
        if let Some(column) = got.iter().zip(want).position(|(g, w)| !cell_eq(g, w)) {
            return Err(Mismatch::Value {
                row,
                column,
                expected: want[column].clone(),
                actual: got[column].clone(),
            });
        }
    }
    Ok(())
}

/// Pass iff there is an error and its message contains `expected_substring`
pub fn compare_error(actual: Option<&str>, expected_substring: &str) -> Result<(), Mismatch> {
    match actual {
        None => Err(Mismatch::UnexpectedSuccess {
            expected_substring: expected_substring.to_string(),
        }),
        Some(message) if message.contains(expected_substring) => Ok(()),
        Some(message) => Err(Mismatch::MissingSubstring {
            expected_substring: expected_substring.to_string(),
            actual_message: message.to_string(),
        }),
    }
}

/// Judge one statement's execution result against its expectation
pub fn verify(case: &StatementCase, result: &DbResult<RowSet>) -> Result<(), Mismatch> {
    match (&case.expectation, result) {
        (Expectation::Error(substring), Ok(_)) => compare_error(None, substring),
        (Expectation::Error(substring), Err(e)) => compare_error(Some(&e.message()), substring),
        (_, Err(e)) => Err(Mismatch::UnexpectedError {
            message: e.message(),
        }),
        (Expectation::Success, Ok(_)) => Ok(()),
        (Expectation::Rows(expected), Ok(set)) if case.normalize => {
            compare_rows(&set.rows, expected)
        }
        (Expectation::Rows(expected), Ok(set)) => compare_rows_strict(&set.rows, expected),
    }
}

#[cfg(test)]
#[path = "verifier_test.rs"]
mod tests;
