//! Migration execution driver.
//!
//! Moves a database from its current version to a target version. Each
//! migration in the resolved batch runs inside its own transaction, and the
//! ledger row for it is written as the last step of that transaction, so a
//! migration is either fully applied and recorded or not at all.

use crate::connection::Database;
use crate::error::{DbError, DbResult};
use crate::ledger::{current_version, ensure_version, record_transition};
use std::path::Path;
use tm_core::{collect_migrations, is_comment_only, load_script, DbConf, Direction, Migration};

/// Outcome of one driver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Direction the batch ran in
    pub direction: Direction,
    /// Version before the run
    pub from: i64,
    /// Version after the run, re-derived from the ledger
    pub to: i64,
    /// Versions committed during the run, in execution order
    pub applied: Vec<i64>,
}

impl RunReport {
    /// True when the run had nothing to do.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Run every migration between the current version and `target`.
///
/// Stops at the first failing migration. Migrations committed before the
/// failure stay committed; the failing one leaves neither schema changes nor
/// a ledger row.
pub fn run(db: &Database, migrations_dir: &Path, target: i64) -> DbResult<RunReport> {
    let current = ensure_version(db)?;
    let batch = collect_migrations(migrations_dir, current, target)?;
    let direction = Direction::between(current, target);

    if batch.is_empty() {
        log::info!("no migrations to run. current version: {current}");
        return Ok(RunReport {
            direction,
            from: current,
            to: current,
            applied: Vec::new(),
        });
    }

    log::info!(
        "Migrating {direction} from {current} to {target} ({} migration(s))",
        batch.len()
    );

    let mut applied = Vec::with_capacity(batch.len());
    for migration in &batch {
        run_migration(db, migration, direction)?;
        applied.push(migration.version);
    }

    let to = current_version(db.conn())?;
    Ok(RunReport {
        direction,
        from: current,
        to,
        applied,
    })
}

/// Open the database described by `conf` and run to `target`.
pub fn run_with_config(conf: &DbConf, target: i64) -> DbResult<RunReport> {
    let db = Database::open(conf)?;
    run(&db, &conf.migrations_dir, target)
}

fn run_migration(db: &Database, migration: &Migration, direction: Direction) -> DbResult<()> {
    let file = migration.file_name();
    let script = load_script(&migration.source, direction)?;

    db.transaction(|conn| {
        for statement in &script.statements {
            if is_comment_only(statement) {
                continue;
            }
            log::debug!("{file}: executing\n{statement}");
            conn.execute_batch(statement)
                .map_err(|e| DbError::MigrationFailed {
                    file: file.clone(),
                    version: migration.version,
                    message: e.to_string(),
                })?;
        }
        record_transition(conn, migration.version, direction.is_up())
    })?;

    log::info!("OK    {file}");
    Ok(())
}
