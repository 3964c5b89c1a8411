//! Down command implementation

use anyhow::{Context, Result};
use tm_core::previous_version;
use tm_db::ensure_version;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_conf, open_database, summarize_run};

/// Execute the down command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let conf = load_conf(global)?;
    let db = open_database(&conf)?;

    let current = ensure_version(&db).context("Failed to read the current version")?;
    let target = previous_version(&conf.migrations_dir, current)
        .with_context(|| format!("Cannot roll back from version {current}"))?;

    let report = tm_db::run(&db, &conf.migrations_dir, target)
        .with_context(|| format!("Rollback to version {target} failed"))?;

    println!("{}", summarize_run(&report));
    Ok(())
}
