//! Target database connection wrapper.
//!
//! [`Database`] owns a DuckDB [`Connection`] and provides helpers for opening
//! it from a [`DbConf`] and running work inside a transaction.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use std::path::Path;
use tm_core::config::{DriverName, IN_MEMORY};
use tm_core::DbConf;

/// Wrapper around the connection migrations run against.
///
/// Single-threaded: one invocation drives one connection, so no `Mutex`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database described by `conf`.
    ///
    /// Fails immediately on connection errors; there is no retry.
    pub fn open(conf: &DbConf) -> DbResult<Self> {
        match conf.driver {
            DriverName::DuckDb => Self::open_duckdb(&conf.open),
        }
    }

    /// Open a DuckDB database from an open string (handles `:memory:`).
    pub fn open_duckdb(open: &str) -> DbResult<Self> {
        if open == IN_MEMORY {
            Self::open_memory()
        } else {
            Self::open_path(Path::new(open))
        }
    }

    /// Open (or create) a DuckDB database file.
    pub fn open_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        log::debug!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    /// Create an in-memory database.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T>(&self, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    self.rollback();
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => self.rollback(),
        }
        result
    }

    fn rollback(&self) {
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            log::warn!("ROLLBACK failed: {e}");
        }
    }

    /// Check if a table exists in the `main` schema.
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        relation_exists(&self.conn, name)
    }
}

/// Check if a table exists in the `main` schema of `conn`.
pub(crate) fn relation_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'main' AND table_name = ?",
            duckdb::params![name],
            |row| row.get(0),
        )
        .map_err(|e| DbError::ExecutionError(e.to_string()))?;
    Ok(count > 0)
}
