use super::*;
use rr_core::row;

async fn session(engine: &DuckDbEngine) -> Box<dyn Session> {
    engine.open_session().await.unwrap()
}

#[tokio::test]
async fn test_in_memory() {
    let engine = DuckDbEngine::in_memory().unwrap();
    assert_eq!(engine.engine_name(), "duckdb");
}

#[tokio::test]
async fn test_select_returns_typed_rows() {
    let engine = DuckDbEngine::in_memory().unwrap();
    let mut s = session(&engine).await;

    let result = s
        .execute("SELECT 1 AS a, 'x' AS b, NULL AS c, true AS d, 2.5::DOUBLE AS e")
        .await
        .unwrap();
    assert_eq!(result.columns, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(result.rows, vec![row![1, "x", Value::Null, true, 2.5]]);
    s.release(Disposition::Commit);
}

#[tokio::test]
async fn test_integer_widths_decode_to_int() {
    let engine = DuckDbEngine::in_memory().unwrap();
    let mut s = session(&engine).await;

    let result = s
        .execute("SELECT 7::TINYINT, (-32767)::SMALLINT, 1234::INTEGER, 9::UBIGINT, 10::HUGEINT")
        .await
        .unwrap();
    assert_eq!(
        result.rows[0],
        vec![
            Value::Int(7),
            Value::Int(-32767),
            Value::Int(1234),
            Value::Int(9),
            Value::Int(10)
        ]
    );
    s.release(Disposition::Commit);
}

#[tokio::test]
async fn test_decimal_and_real_decode_to_float() {
    let engine = DuckDbEngine::in_memory().unwrap();
    let mut s = session(&engine).await;

    let result = s
        .execute("SELECT 34.5::DECIMAL(5,1), 0.1::REAL")
        .await
        .unwrap();
    assert_eq!(result.rows[0][0], Value::Float(34.5));
    assert_eq!(result.rows[0][1], Value::Float(0.1));
    s.release(Disposition::Commit);
}

#[tokio::test]
async fn test_temporal_values_render_as_text() {
    let engine = DuckDbEngine::in_memory().unwrap();
    let mut s = session(&engine).await;

    let result = s
        .execute("SELECT DATE '2024-02-29', TIMESTAMP '2024-02-29 13:45:00'")
        .await
        .unwrap();
    assert_eq!(
        result.rows[0],
        vec![
            Value::Text("2024-02-29".into()),
            Value::Text("2024-02-29 13:45:00".into())
        ]
    );
    s.release(Disposition::Commit);
}

#[tokio::test]
async fn test_error_carries_engine_message() {
    let engine = DuckDbEngine::in_memory().unwrap();
    let mut s = session(&engine).await;

    let err = s.execute("SELECT 1 / 0::INTEGER FROM missing_tbl").await.unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
    assert!(err.message().contains("missing_tbl"));
    s.release(Disposition::Rollback);
}

#[tokio::test]
async fn test_sessions_share_schema() {
    let engine = DuckDbEngine::in_memory().unwrap();

    let mut first = session(&engine).await;
    first.execute("CREATE TABLE int2_tbl(f1 SMALLINT)").await.unwrap();
    first
        .execute("INSERT INTO int2_tbl VALUES (0), (1234), (-1234)")
        .await
        .unwrap();
    first.release(Disposition::Commit);

    let mut second = session(&engine).await;
    let result = second
        .execute("SELECT f1 FROM int2_tbl ORDER BY f1")
        .await
        .unwrap();
    assert_eq!(result.rows, vec![row![-1234], row![0], row![1234]]);
    second.release(Disposition::Commit);
}

#[tokio::test]
async fn test_rollback_discards_open_transaction() {
    let engine = DuckDbEngine::in_memory().unwrap();

    let mut s = session(&engine).await;
    s.execute("CREATE TABLE t(id INTEGER)").await.unwrap();
    s.execute("BEGIN TRANSACTION").await.unwrap();
    s.execute("INSERT INTO t VALUES (1)").await.unwrap();
    s.release(Disposition::Rollback);

    let mut check = session(&engine).await;
    let result = check.execute("SELECT count(*) FROM t").await.unwrap();
    assert_eq!(result.rows, vec![row![0]]);
    check.release(Disposition::Commit);
}

#[tokio::test]
async fn test_release_without_transaction_is_harmless() {
    let engine = DuckDbEngine::in_memory().unwrap();
    let s = session(&engine).await;
    s.release(Disposition::Commit);
    let s = session(&engine).await;
    s.release(Disposition::Rollback);
}
