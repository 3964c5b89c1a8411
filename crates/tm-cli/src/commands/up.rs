//! Up command implementation

use anyhow::{Context, Result};
use tm_core::{most_recent_version, CoreError};

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{load_conf, open_database, summarize_run};

/// Execute the up command
pub fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let conf = load_conf(global)?;

    let target = match args.to {
        Some(version) => version,
        None => match most_recent_version(&conf.migrations_dir) {
            Ok(version) => version,
            Err(CoreError::NoMigrations { path }) => {
                println!("No migrations found in {path}");
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to resolve the most recent version"),
        },
    };

    let db = open_database(&conf)?;
    let report = tm_db::run(&db, &conf.migrations_dir, target)
        .with_context(|| format!("Migration to version {target} failed"))?;

    println!("{}", summarize_run(&report));
    Ok(())
}
