//! Create command implementation

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tm_core::config::MIGRATIONS_DIR;
use tm_core::{migration_filename, render_scaffold};

use crate::cli::{CreateArgs, GlobalArgs};

/// Execute the create command
pub fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let dir = match &args.dir {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(&global.path).join(MIGRATIONS_DIR),
    };

    let path = write_migration(&dir, &args.name, Utc::now())?;
    println!("Created migration {}", path.display());
    Ok(())
}

/// Reject names that would place the file outside the target directory.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Migration name must not be empty");
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        bail!("Migration name '{name}' must not contain path separators or '..'");
    }
    Ok(())
}

/// Write a scaffold for `name` into `dir`, creating `dir` if needed.
///
/// Refuses to overwrite an existing file.
fn write_migration(dir: &Path, name: &str, now: DateTime<Utc>) -> Result<PathBuf> {
    validate_name(name)?;

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let path = dir.join(migration_filename(name, now));
    if path.exists() {
        bail!("Migration file already exists: {}", path.display());
    }

    fs::write(&path, render_scaffold(now))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Wrote scaffold {}", path.display());
    Ok(path)
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
