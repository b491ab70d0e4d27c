//! DuckDB engine implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Disposition, Engine, RowSet, Session};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::Connection;
use rr_core::value::{Row, Value};
use std::path::Path;
use std::sync::Mutex;

/// Days between 0001-01-01 and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// DuckDB engine. Each session is a cloned connection to the same database,
/// so later fixtures see the schema created by earlier ones.
pub struct DuckDbEngine {
    conn: Mutex<Connection>,
}

impl DuckDbEngine {
    /// Create a new in-memory DuckDB database
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a DuckDB database file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn open_session_sync(&self) -> DbResult<DuckDbSession> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?;
        let session_conn = conn
            .try_clone()
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(DuckDbSession {
            conn: session_conn,
        })
    }
}

#[async_trait]
impl Engine for DuckDbEngine {
    async fn open_session(&self) -> DbResult<Box<dyn Session>> {
        Ok(Box::new(self.open_session_sync()?))
    }

    fn engine_name(&self) -> &'static str {
        "duckdb"
    }
}

/// One DuckDB connection, owned by a single fixture run
pub struct DuckDbSession {
    conn: Connection,
}

impl DuckDbSession {
    /// Execute and collect rows.
    ///
    /// DuckDB 1.4 panics on `stmt.column_count()` before execution, so rows
    /// are collected via `query_map` first and column metadata read after.
    fn execute_sync(&mut self, sql: &str) -> DbResult<RowSet> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows: Vec<Row> = stmt
            .query_map([], |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count)
                    .map(|i| row.get::<_, DuckValue>(i).map(convert_value))
                    .collect::<Result<Row, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let columns = (0..stmt.column_count())
            .map(|i| {
                stmt.column_name(i)
                    .map_or("?".to_string(), |v| v.to_string())
            })
            .collect();

        Ok(RowSet { columns, rows })
    }
}

#[async_trait]
impl Session for DuckDbSession {
    async fn execute(&mut self, sql: &str) -> DbResult<RowSet> {
        self.execute_sync(sql)
    }

    fn release(self: Box<Self>, disposition: Disposition) {
        let sql = match disposition {
            Disposition::Commit => "COMMIT",
            Disposition::Rollback => "ROLLBACK",
        };
        // Sessions run in autocommit unless a fixture opened a transaction;
        // "no transaction is active" is the normal outcome here.
        if let Err(e) = self.conn.execute_batch(sql) {
            log::debug!("{} on session release: {}", sql, e);
        }
    }
}

/// Convert a DuckDB cell into a harness value.
///
/// Integers of every width decode to `Int`, floating and decimal types to
/// `Float`, temporal types to their canonical text form.
pub(crate) fn convert_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(n) => Value::Int(n.into()),
        DuckValue::SmallInt(n) => Value::Int(n.into()),
        DuckValue::Int(n) => Value::Int(n.into()),
        DuckValue::BigInt(n) => Value::Int(n),
        DuckValue::UTinyInt(n) => Value::Int(n.into()),
        DuckValue::USmallInt(n) => Value::Int(n.into()),
        DuckValue::UInt(n) => Value::Int(n.into()),
        DuckValue::UBigInt(n) => i64::try_from(n)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(n.to_string())),
        DuckValue::HugeInt(n) => i64::try_from(n)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(n.to_string())),
        // f32 widened through its shortest decimal form so 0.1 stays 0.1
        DuckValue::Float(f) => Value::Float(f.to_string().parse().unwrap_or(f64::from(f))),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Decimal(d) => {
            let text = d.to_string();
            text.parse::<f64>()
                .map(Value::Float)
                .unwrap_or(Value::Text(text))
        }
        DuckValue::Text(s) | DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Blob(bytes) => Value::Text(format!("\\x{}", hex(&bytes))),
        DuckValue::Timestamp(unit, v) => {
            let micros = to_micros(unit, v);
            match DateTime::from_timestamp_micros(micros) {
                Some(ts) => Value::Text(ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
                None => Value::Text(micros.to_string()),
            }
        }
        DuckValue::Date32(days) => {
            match NaiveDate::from_num_days_from_ce_opt(days.saturating_add(UNIX_EPOCH_DAYS_FROM_CE))
            {
                Some(date) => Value::Text(date.format("%Y-%m-%d").to_string()),
                None => Value::Text(days.to_string()),
            }
        }
        DuckValue::Time64(unit, v) => {
            let micros = to_micros(unit, v);
            let secs = u32::try_from(micros.div_euclid(1_000_000)).unwrap_or(0);
            let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).unwrap_or(0);
            match NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos) {
                Some(t) => Value::Text(t.format("%H:%M:%S%.f").to_string()),
                None => Value::Text(micros.to_string()),
            }
        }
        other => Value::Text(format!("{other:?}")),
    }
}

fn to_micros(unit: TimeUnit, v: i64) -> i64 {
    match unit {
        TimeUnit::Second => v.saturating_mul(1_000_000),
        TimeUnit::Millisecond => v.saturating_mul(1_000),
        TimeUnit::Microsecond => v,
        TimeUnit::Nanosecond => v / 1_000,
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
