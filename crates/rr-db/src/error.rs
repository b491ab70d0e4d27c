//! Error types for rr-db

use thiserror::Error;

/// Engine operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Mutex poisoned (D003)
    #[error("[D003] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Session used after release (D004)
    #[error("[D004] Session already released")]
    SessionClosed,

    /// Internal error (D005)
    #[error("[D005] Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// The engine's own message, without the harness code prefix.
    ///
    /// Expected-error substrings are matched against this text.
    pub fn message(&self) -> String {
        match self {
            DbError::ConnectionError(msg)
            | DbError::ExecutionError(msg)
            | DbError::MutexPoisoned(msg)
            | DbError::Internal(msg) => msg.clone(),
            DbError::SessionClosed => "session already released".to_string(),
        }
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_strips_code() {
        let err = DbError::ExecutionError("Conversion Error: out of range".into());
        assert_eq!(err.message(), "Conversion Error: out of range");
        assert!(err.to_string().starts_with("[D002]"));
    }
}
