//! Status command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use tm_db::ledger::derive_current_version;
use tm_db::{ensure_initialized, history, LedgerEntry};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{load_conf, open_database, print_table};

const APPLIED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// JSON shape of `tm status --output json`.
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    environment: &'a str,
    current_version: i64,
    history: &'a [LedgerEntry],
}

/// Execute the status command
pub fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let conf = load_conf(global)?;
    let db = open_database(&conf)?;

    ensure_initialized(&db).context("Failed to create the version table")?;
    let entries = history(db.conn()).context("Failed to read migration history")?;
    let current_version = derive_current_version(&entries);

    match args.output {
        StatusOutput::Json => {
            let report = StatusReport {
                environment: &conf.env,
                current_version,
                history: &entries,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatusOutput::Table => {
            if entries.is_empty() {
                println!("No migrations recorded.");
            } else {
                print_table(&["STATUS", "VERSION", "APPLIED AT"], &status_rows(&entries));
                println!();
            }
            println!("Current version: {current_version}");
        }
    }
    Ok(())
}

/// Table rows for ledger entries, in the order given.
fn status_rows(entries: &[LedgerEntry]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            let status = if entry.applied {
                "applied"
            } else {
                "rolled back"
            };
            vec![
                status.to_string(),
                entry.version.to_string(),
                entry.applied_at.format(APPLIED_AT_FORMAT).to_string(),
            ]
        })
        .collect()
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
