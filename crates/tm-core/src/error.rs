//! Error types for tm-core

use thiserror::Error;

/// Core error type for Tidemark
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: dbconf.yml could not be parsed
    #[error("[E003] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// E004: IO error with file path context
    #[error("[E004] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E005: Migrations directory does not exist
    #[error("[E005] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E006: Two files claim the same version
    #[error("[E006] More than one file specifies the migration for version {version} ({first} and {second})")]
    DuplicateVersion {
        version: i64,
        first: String,
        second: String,
    },

    /// E007: Script has neither an `up` nor a `down` directive
    #[error("[E007] No up/down annotations found in {path}, so no statements can be executed")]
    AnnotationMissing { path: String },

    /// E008: Directory holds no migration files
    #[error("[E008] No valid migration version found in {path}")]
    NoMigrations { path: String },

    /// E009: Nothing precedes the requested version
    #[error("[E009] No previous version found for {version}")]
    NoPreviousVersion { version: i64 },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
