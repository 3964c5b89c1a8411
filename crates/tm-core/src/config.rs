//! Configuration types and parsing for dbconf.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the connection config file inside the project's db directory.
pub const CONFIG_FILE: &str = "dbconf.yml";

/// Directory, relative to the db directory, that holds migration files.
pub const MIGRATIONS_DIR: &str = "migrations";

/// Environment used when neither `--env` nor `TM_ENV` is given.
pub const DEFAULT_ENV: &str = "development";

/// Open string that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// One environment section of dbconf.yml, before variable expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Database driver name
    pub driver: String,

    /// Driver-specific open string (for DuckDB, a file path or `:memory:`)
    pub open: String,
}

/// Supported database drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DriverName {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DriverName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverName::DuckDb => write!(f, "duckdb"),
        }
    }
}

impl std::str::FromStr for DriverName {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "duckdb" => Ok(DriverName::DuckDb),
            other => Err(CoreError::ConfigInvalid {
                message: format!("Unsupported driver '{}'. Supported drivers: duckdb", other),
            }),
        }
    }
}

/// Resolved connection settings for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConf {
    /// Directory holding the migration files
    pub migrations_dir: PathBuf,

    /// Environment name the settings were loaded for
    pub env: String,

    /// Database driver
    pub driver: DriverName,

    /// Open string with environment variables expanded
    pub open: String,
}

impl DbConf {
    /// Load the `env` section of `<dir>/dbconf.yml`.
    pub fn load(dir: &Path, env: &str) -> CoreResult<Self> {
        Self::load_with(dir, env, |name| std::env::var(name).ok())
    }

    /// Load with a custom variable lookup used for `$VAR` expansion.
    pub fn load_with<F>(dir: &Path, env: &str, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let environments: BTreeMap<String, EnvironmentConfig> = serde_yaml::from_str(&content)?;

        let section = environments
            .get(env)
            .ok_or_else(|| CoreError::ConfigInvalid {
                message: format!(
                    "Environment '{}' not found in {}. Available environments: {}",
                    env,
                    path.display(),
                    environments
                        .keys()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })?;

        let driver: DriverName = expand_vars(&section.driver, &lookup).parse()?;
        let open = expand_vars(&section.open, &lookup);
        if open.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: format!("Environment '{}' has an empty 'open' string", env),
            });
        }

        Ok(Self {
            migrations_dir: dir.join(MIGRATIONS_DIR),
            env: env.to_string(),
            driver,
            open,
        })
    }

    /// Settings for an in-memory DuckDB database over `migrations_dir`.
    pub fn in_memory(migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
            env: DEFAULT_ENV.to_string(),
            driver: DriverName::DuckDb,
            open: IN_MEMORY.to_string(),
        }
    }

    /// True when the open string selects an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.open == IN_MEMORY
    }

    /// Resolve the environment from CLI flag or TM_ENV environment variable
    ///
    /// Priority: CLI flag > TM_ENV env var > `development`
    pub fn resolve_env(cli_env: Option<&str>) -> String {
        cli_env
            .map(String::from)
            .or_else(|| std::env::var("TM_ENV").ok())
            .unwrap_or_else(|| DEFAULT_ENV.to_string())
    }
}

/// Expand `$VAR` and `${VAR}` references using `lookup`.
///
/// Unset variables expand to the empty string. A `$` not followed by a
/// variable name is kept as-is.
///
/// # Examples
/// ```
/// use tm_core::config::expand_vars;
/// let lookup = |name: &str| (name == "HOME").then(|| "/home/me".to_string());
/// assert_eq!(expand_vars("$HOME/db.duckdb", &lookup), "/home/me/db.duckdb");
/// assert_eq!(expand_vars("${HOME}x", &lookup), "/home/mex");
/// assert_eq!(expand_vars("$MISSING/db", &lookup), "/db");
/// ```
pub fn expand_vars<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices();

    while let Some((i, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let rest = &input[i + 1..];
        if let Some(braced) = rest.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                let name = &braced[..end];
                out.push_str(&lookup(name).unwrap_or_default());
                // skip `{`, the name, and `}`
                for _ in 0..name.chars().count() + 2 {
                    chars.next();
                }
                continue;
            }
            out.push(c);
            continue;
        }

        let name_len: usize = rest
            .chars()
            .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .count();
        if name_len == 0 {
            out.push(c);
            continue;
        }
        out.push_str(&lookup(&rest[..name_len]).unwrap_or_default());
        for _ in 0..name_len {
            chars.next();
        }
    }
    out
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
