//! Error types for tm-db

use thiserror::Error;
use tm_core::CoreError;

/// Database and migration errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Version table not found (D003)
    #[error("[D003] Version table not found: {0}")]
    TableNotFound(String),

    /// Transaction management error (D004)
    #[error("[D004] Database transaction failed: {0}")]
    TransactionError(String),

    /// A migration statement failed; its transaction was rolled back (D005)
    #[error("[D005] FAIL {file} (version {version}): {message}, quitting migration")]
    MigrationFailed {
        file: String,
        version: i64,
        message: String,
    },

    /// Resolution, parsing, or config error from tm-core
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
