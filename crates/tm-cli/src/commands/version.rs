//! Version command implementation

use anyhow::{Context, Result};
use tm_db::ensure_version;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_conf, open_database};

/// Execute the version command
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let conf = load_conf(global)?;
    let db = open_database(&conf)?;
    let current = ensure_version(&db).context("Failed to read the current version")?;
    println!("{current}");
    Ok(())
}
