//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tidemark - versioned SQL migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding dbconf.yml and the migrations/ folder
    #[arg(short = 'p', long, global = true, default_value = "db")]
    pub path: String,

    /// Environment section of dbconf.yml (falls back to TM_ENV, then development)
    #[arg(short, long, global = true)]
    pub env: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate the database to the most recent version
    Up(UpArgs),

    /// Roll back the most recently applied migration
    Down,

    /// Roll back the most recently applied migration, then apply it again
    Redo,

    /// Show the migration history recorded in the database
    Status(StatusArgs),

    /// Print the current version of the database
    Version,

    /// Create a new migration file with empty up and down sections
    Create(CreateArgs),
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Stop at this version instead of the most recent one
    #[arg(long)]
    pub to: Option<i64>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable table
    Table,
    /// JSON document
    Json,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Short description used in the file name (e.g. add_users)
    pub name: String,

    /// Directory to write the file to (default: <path>/migrations)
    #[arg(short, long)]
    pub dir: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
