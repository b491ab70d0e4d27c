use super::*;
use rr_core::row;
use rr_db::DbError;

fn int2_rows() -> Vec<Row> {
    vec![row![0], row![1234], row![-1234], row![32767], row![-32767]]
}

#[test]
fn test_compare_rows_empty() {
    assert_eq!(compare_rows(&[], &[]), Ok(()));
}

#[test]
fn test_compare_rows_is_idempotent() {
    let captured = vec![
        row![1, "one", 1.5, Value::Null, true],
        row![2, Value::Empty, f64::NAN, "x", false],
    ];
    assert_eq!(compare_rows(&captured, &captured), Ok(()));
}

#[test]
fn test_compare_rows_exact_order() {
    assert_eq!(compare_rows(&int2_rows(), &int2_rows()), Ok(()));
}

#[test]
fn test_compare_rows_rejects_reordered_rows() {
    let mut reordered = int2_rows();
    reordered.swap(1, 2);
    assert_eq!(
        compare_rows(&reordered, &int2_rows()),
        Err(Mismatch::Value {
            row: 1,
            column: 0,
            expected: Value::Int(1234),
            actual: Value::Int(-1234),
        })
    );
}

#[test]
fn test_compare_rows_count_mismatch() {
    let fewer = int2_rows()[..4].to_vec();
    assert_eq!(
        compare_rows(&fewer, &int2_rows()),
        Err(Mismatch::RowCount {
            expected: 5,
            actual: 4
        })
    );
}

#[test]
fn test_compare_rows_column_mismatch() {
    let result = compare_rows(&[row![1, 2]], &[row![1]]);
    assert_eq!(
        result,
        Err(Mismatch::ColumnCount {
            row: 0,
            expected: 1,
            actual: 2
        })
    );
}

#[test]
fn test_null_and_empty_sentinel_in_both_positions() {
    assert_eq!(compare_rows(&[row![Value::Null]], &[row![Value::Empty]]), Ok(()));
    assert_eq!(compare_rows(&[row![Value::Empty]], &[row![Value::Null]]), Ok(()));
    assert!(compare_rows(&[row![Value::Null]], &[row![0]]).is_err());
}

#[test]
fn test_numeric_comparison_by_decoded_value() {
    assert_eq!(compare_rows(&[row![34.0]], &[row![34]]), Ok(()));
    assert_eq!(compare_rows(&[row![34]], &[row!["34"]]), Ok(()));
    assert!(compare_rows(&[row![34.5]], &[row![34]]).is_err());
}

#[test]
fn test_compare_error_substring() {
    assert_eq!(
        compare_error(
            Some("ERROR: division by zero at line 4"),
            "division by zero"
        ),
        Ok(())
    );
    assert!(matches!(
        compare_error(Some("ERROR: syntax error"), "division by zero"),
        Err(Mismatch::MissingSubstring { .. })
    ));
    assert!(matches!(
        compare_error(None, "division by zero"),
        Err(Mismatch::UnexpectedSuccess { .. })
    ));
}

#[test]
fn test_verify_success_expectation() {
    let ok: DbResult<RowSet> = Ok(RowSet::from_rows(vec![row![1]]));
    assert_eq!(verify(&StatementCase::ok("SELECT 1"), &ok), Ok(()));

    let err: DbResult<RowSet> = Err(DbError::ExecutionError("boom".into()));
    assert_eq!(
        verify(&StatementCase::ok("SELECT 1"), &err),
        Err(Mismatch::UnexpectedError {
            message: "boom".into()
        })
    );
}

#[test]
fn test_verify_error_expectation_uses_raw_engine_message() {
    let err: DbResult<RowSet> = Err(DbError::ExecutionError(
        "Conversion Error: Could not convert string '34.5' to INT16".into(),
    ));
    let sql = "INSERT INTO int2_tbl VALUES ('34.5')";
    let expectation = StatementCase::error(sql, "Could not convert string");
    assert_eq!(verify(&expectation, &err), Ok(()));

    // The harness code prefix is not part of the engine message
    let prefixed = StatementCase::error(sql, "[D002]");
    assert!(verify(&prefixed, &err).is_err());
}

#[test]
fn test_verify_rows_expectation_with_error() {
    let err: DbResult<RowSet> = Err(DbError::ExecutionError("no such table".into()));
    assert!(matches!(
        verify(&StatementCase::rows("SELECT f1 FROM int2_tbl", int2_rows()), &err),
        Err(Mismatch::UnexpectedError { .. })
    ));
}

#[test]
fn test_compare_rows_strict_requires_matching_types() {
    assert_eq!(compare_rows_strict(&[row![34]], &[row![34]]), Ok(()));
    assert_eq!(
        compare_rows_strict(&[row![34.0]], &[row![34]]),
        Err(Mismatch::Value {
            row: 0,
            column: 0,
            expected: Value::Int(34),
            actual: Value::Float(34.0),
        })
    );
    assert!(compare_rows_strict(&[row!["34"]], &[row![34]]).is_err());
    assert_eq!(compare_rows_strict(&[row![Value::Null]], &[row![Value::Empty]]), Ok(()));
}

#[test]
fn test_verify_honours_disabled_normalization() {
    let ok: DbResult<RowSet> = Ok(RowSet::from_rows(vec![row![1.0]]));
    let normalized = StatementCase::rows("SELECT 1.0", vec![row![1]]);
    assert_eq!(verify(&normalized, &ok), Ok(()));
    assert!(matches!(
        verify(&normalized.strict(), &ok),
        Err(Mismatch::Value { .. })
    ));
}

#[test]
fn test_mismatch_messages() {
    let m = Mismatch::Value {
        row: 0,
        column: 1,
        expected: Value::Int(3),
        actual: Value::Text("x".into()),
    };
    assert_eq!(
        m.to_string(),
        "row 0, column 1: expected 3 (int), got x (text)"
    );
}
