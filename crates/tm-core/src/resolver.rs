//! Version resolution over a directory of migration files.
//!
//! Migration files are named `<version>_<description>.sql`. The resolver walks
//! the migrations directory, extracts versions, and computes the ordered batch
//! of migrations that moves the database from one version to another.

use crate::error::{CoreError, CoreResult};
use crate::script::Direction;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sentinel for "no neighbouring version in this batch".
pub const NO_VERSION: i64 = -1;

/// Extension every migration file must carry.
pub const MIGRATION_EXTENSION: &str = "sql";

/// Why a file name is not a migration.
///
/// Never fatal: files that fail here are skipped so that READMEs and other
/// files can live alongside the migrations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// File does not end in `.sql`
    #[error("not a .sql migration file")]
    WrongExtension,
    /// No `_` separating version from description
    #[error("file name must look like <version>_<name>.sql")]
    MissingSeparator,
    /// Leading component is not an integer
    #[error("version '{0}' is not an integer")]
    NotNumeric(String),
    /// Leading component is zero or negative
    #[error("migration versions must be greater than zero, got {0}")]
    NotPositive(i64),
}

/// One migration file, positioned within a resolved batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Version parsed from the file name
    pub version: i64,
    /// Path of the `.sql` file
    pub source: PathBuf,
    /// Version run just before this one in the batch, or [`NO_VERSION`]
    pub previous: i64,
    /// Version run just after this one in the batch, or [`NO_VERSION`]
    pub next: i64,
}

impl Migration {
    fn new(version: i64, source: PathBuf) -> Self {
        Self {
            version,
            source,
            previous: NO_VERSION,
            next: NO_VERSION,
        }
    }

    /// File name of the source, for messages.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.file_name())
    }
}

/// Extract the version from a migration file name.
///
/// # Examples
/// ```
/// use tm_core::resolver::numeric_component;
/// use std::path::Path;
/// assert_eq!(numeric_component(Path::new("migrations/001_init.sql")), Ok(1));
/// assert!(numeric_component(Path::new("abc_init.sql")).is_err());
/// ```
pub fn numeric_component(path: &Path) -> Result<i64, FilenameError> {
    if !path
        .extension()
        .is_some_and(|e| e == MIGRATION_EXTENSION)
    {
        return Err(FilenameError::WrongExtension);
    }

    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(FilenameError::WrongExtension)?;

    let (prefix, _) = base
        .split_once('_')
        .ok_or(FilenameError::MissingSeparator)?;

    let version: i64 = prefix
        .parse()
        .map_err(|_| FilenameError::NotNumeric(prefix.to_string()))?;
    if version <= 0 {
        return Err(FilenameError::NotPositive(version));
    }
    Ok(version)
}

/// Whether version `v` belongs in the batch from `current` to `target`.
///
/// Forward runs take `(current, target]`, reverse runs `(target, current]`.
fn version_filter(v: i64, current: i64, target: i64) -> bool {
    if target > current {
        return v > current && v <= target;
    }
    if target < current {
        return v <= current && v > target;
    }
    false
}

/// Recursively walk `dir`, calling `visit` for every regular file whose name
/// carries a valid version. Entries are visited in sorted order.
fn walk_migrations<F>(dir: &Path, visit: &mut F) -> CoreResult<()>
where
    F: FnMut(i64, PathBuf) -> CoreResult<()>,
{
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read {}: {}", dir.display(), e);
            return Ok(());
        }
    };

    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            walk_migrations(&path, visit)?;
            continue;
        }
        if !path.is_file() {
            continue;
        }
        match numeric_component(&path) {
            Ok(version) => visit(version, path)?,
            Err(e) => log::debug!("Skipping {}: {}", path.display(), e),
        }
    }
    Ok(())
}

fn ensure_dir(dir: &Path) -> CoreResult<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(CoreError::MigrationsDirNotFound {
            path: dir.display().to_string(),
        })
    }
}

/// Sort a batch for `direction` and link each migration to its neighbours.
fn sort_batch(migrations: &mut [Migration], direction: Direction) {
    match direction {
        Direction::Up => migrations.sort_by_key(|m| m.version),
        Direction::Down => migrations.sort_by_key(|m| std::cmp::Reverse(m.version)),
    }

    for i in 0..migrations.len() {
        migrations[i].previous = if i > 0 {
            migrations[i - 1].version
        } else {
            NO_VERSION
        };
        migrations[i].next = migrations
            .get(i + 1)
            .map_or(NO_VERSION, |m| m.version);
    }
}

/// Collect the migrations needed to move from `current` to `target`.
///
/// The result is ascending for forward runs and descending for rollbacks.
/// `current == target` yields an empty batch. Two files with the same version
/// anywhere under `dir` fail the whole resolution.
pub fn collect_migrations(dir: &Path, current: i64, target: i64) -> CoreResult<Vec<Migration>> {
    ensure_dir(dir)?;

    let mut seen: Vec<Migration> = Vec::new();
    walk_migrations(dir, &mut |version, path| {
        if let Some(existing) = seen.iter().find(|m| m.version == version) {
            return Err(CoreError::DuplicateVersion {
                version,
                first: existing.source.display().to_string(),
                second: path.display().to_string(),
            });
        }
        seen.push(Migration::new(version, path));
        Ok(())
    })?;

    let mut batch: Vec<Migration> = seen
        .into_iter()
        .filter(|m| version_filter(m.version, current, target))
        .collect();
    sort_batch(&mut batch, Direction::between(current, target));

    log::debug!(
        "Resolved {} migration(s) between {} and {} in {}",
        batch.len(),
        current,
        target,
        dir.display()
    );
    Ok(batch)
}

/// Highest version present in `dir`.
pub fn most_recent_version(dir: &Path) -> CoreResult<i64> {
    ensure_dir(dir)?;

    let mut latest: Option<i64> = None;
    walk_migrations(dir, &mut |version, _| {
        latest = Some(latest.map_or(version, |l| l.max(version)));
        Ok(())
    })?;

    latest.ok_or_else(|| CoreError::NoMigrations {
        path: dir.display().to_string(),
    })
}

/// Highest version in `dir` strictly below `version`.
///
/// Returns `0` when `version` itself exists but nothing precedes it, meaning
/// "roll back to before all migrations".
pub fn previous_version(dir: &Path, version: i64) -> CoreResult<i64> {
    ensure_dir(dir)?;

    let mut previous: Option<i64> = None;
    let mut saw_given = false;
    walk_migrations(dir, &mut |v, _| {
        if v < version {
            previous = Some(previous.map_or(v, |p| p.max(v)));
        }
        if v == version {
            saw_given = true;
        }
        Ok(())
    })?;

    match previous {
        Some(p) => Ok(p),
        None if saw_given => Ok(0),
        None => Err(CoreError::NoPreviousVersion { version }),
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
