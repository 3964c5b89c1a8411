//! The `db_version` ledger.
//!
//! Every applied or rolled-back migration appends one row; rows are never
//! updated or deleted. The current version is derived from the history rather
//! than stored.

use crate::connection::{relation_exists, Database};
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use duckdb::Connection;
use serde::Serialize;
use std::collections::HashSet;

/// Name of the ledger table.
pub const VERSION_TABLE: &str = "db_version";

/// Version reported when no migration is applied.
pub const BASE_VERSION: i64 = 0;

const CREATE_VERSION_TABLE_SQL: &str = "CREATE SEQUENCE IF NOT EXISTS db_version_id_seq START 1;
CREATE TABLE db_version (
    id         BIGINT PRIMARY KEY DEFAULT nextval('db_version_id_seq'),
    version    BIGINT NOT NULL,
    applied    BOOLEAN NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT now()
);";

const INSERT_VERSION_SQL: &str = "INSERT INTO db_version (version, applied) VALUES (?, ?)";

const HISTORY_SQL: &str =
    "SELECT version, applied, epoch_ms(created_at) FROM db_version ORDER BY id DESC";

/// One row of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Migration version the row concerns
    pub version: i64,
    /// When the row was written
    pub applied_at: DateTime<Utc>,
    /// `true` for an apply, `false` for a rollback
    pub applied: bool,
}

/// Derive the current version from entries ordered most recent first.
///
/// The newest row for each version decides whether it is applied; the first
/// version whose newest row is an apply is current. With no such version the
/// database sits at [`BASE_VERSION`].
pub fn derive_current_version<'a, I>(entries_newest_first: I) -> i64
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut decided: HashSet<i64> = HashSet::new();
    for entry in entries_newest_first {
        if !decided.insert(entry.version) {
            continue;
        }
        if entry.applied {
            return entry.version;
        }
    }
    BASE_VERSION
}

/// Read the full ledger, most recent row first.
///
/// Returns [`DbError::TableNotFound`] when the ledger has not been created.
pub fn history(conn: &Connection) -> DbResult<Vec<LedgerEntry>> {
    if !relation_exists(conn, VERSION_TABLE)? {
        return Err(DbError::TableNotFound(VERSION_TABLE.to_string()));
    }

    let mut stmt = conn
        .prepare(HISTORY_SQL)
        .map_err(|e| DbError::ExecutionError(format!("failed to read {VERSION_TABLE}: {e}")))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, bool>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })
        .map_err(|e| DbError::ExecutionError(format!("failed to read {VERSION_TABLE}: {e}")))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DbError::ExecutionError(format!("row error: {e}")))?;

    rows.into_iter()
        .map(|(version, applied, millis)| {
            let applied_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
                DbError::ExecutionError(format!(
                    "invalid created_at for version {version}: {millis}"
                ))
            })?;
            Ok(LedgerEntry {
                version,
                applied_at,
                applied,
            })
        })
        .collect()
}

/// Current version of the database, derived from the ledger.
///
/// Returns [`DbError::TableNotFound`] when the ledger does not exist yet.
pub fn current_version(conn: &Connection) -> DbResult<i64> {
    let entries = history(conn)?;
    Ok(derive_current_version(&entries))
}

/// Create the ledger if it is missing.
///
/// Only [`DbError::TableNotFound`] triggers creation; any other error is
/// returned as-is.
pub fn ensure_initialized(db: &Database) -> DbResult<()> {
    match history(db.conn()) {
        Ok(_) => Ok(()),
        Err(DbError::TableNotFound(_)) => create_version_table(db),
        Err(e) => Err(e),
    }
}

/// Current version, creating the ledger first if it does not exist.
pub fn ensure_version(db: &Database) -> DbResult<i64> {
    match current_version(db.conn()) {
        Err(DbError::TableNotFound(_)) => {
            create_version_table(db)?;
            Ok(BASE_VERSION)
        }
        other => other,
    }
}

fn create_version_table(db: &Database) -> DbResult<()> {
    log::info!("Creating {VERSION_TABLE} table");
    db.transaction(|conn| {
        conn.execute_batch(CREATE_VERSION_TABLE_SQL).map_err(|e| {
            DbError::ExecutionError(format!("failed to create {VERSION_TABLE} table: {e}"))
        })
    })
}

/// Append a ledger row for `version`.
///
/// Meant to run as the last statement of the transaction that applied or
/// rolled back the migration.
pub fn record_transition(conn: &Connection, version: i64, applied: bool) -> DbResult<()> {
    conn.execute(INSERT_VERSION_SQL, duckdb::params![version, applied])
        .map_err(|e| {
            DbError::ExecutionError(format!("failed to record version {version}: {e}"))
        })?;
    Ok(())
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
