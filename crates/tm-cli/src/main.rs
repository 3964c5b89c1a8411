//! Tidemark CLI - versioned SQL migrations for DuckDB

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{create, down, redo, status, up, version};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match &cli.command {
        cli::Commands::Up(args) => up::execute(args, &cli.global),
        cli::Commands::Down => down::execute(&cli.global),
        cli::Commands::Redo => redo::execute(&cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::Version => version::execute(&cli.global),
        cli::Commands::Create(args) => create::execute(args, &cli.global),
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
