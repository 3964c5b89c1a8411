//! Redo command implementation

use anyhow::{Context, Result};
use tm_core::previous_version;
use tm_db::ensure_version;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_conf, open_database, summarize_run};

/// Execute the redo command
///
/// Rolls the current version back and applies it again, which is handy while
/// iterating on the newest migration.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let conf = load_conf(global)?;
    let db = open_database(&conf)?;

    let current = ensure_version(&db).context("Failed to read the current version")?;
    let previous = previous_version(&conf.migrations_dir, current)
        .with_context(|| format!("Cannot redo version {current}"))?;

    let down = tm_db::run(&db, &conf.migrations_dir, previous)
        .with_context(|| format!("Rollback to version {previous} failed"))?;
    println!("{}", summarize_run(&down));

    let up = tm_db::run(&db, &conf.migrations_dir, current)
        .with_context(|| format!("Re-applying version {current} failed"))?;
    println!("{}", summarize_run(&up));
    Ok(())
}
