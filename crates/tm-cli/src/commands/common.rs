//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use tm_core::DbConf;
use tm_db::{Database, RunReport};

use crate::cli::GlobalArgs;

/// Load the connection settings selected by `--path` and `--env`.
pub(crate) fn load_conf(global: &GlobalArgs) -> Result<DbConf> {
    let env = DbConf::resolve_env(global.env.as_deref());
    DbConf::load(Path::new(&global.path), &env)
        .with_context(|| format!("Failed to load configuration for environment '{env}'"))
}

/// Open the target database described by `conf`.
pub(crate) fn open_database(conf: &DbConf) -> Result<Database> {
    Database::open(conf)
        .with_context(|| format!("Failed to open {} database '{}'", conf.driver, conf.open))
}

/// One-line summary of a driver run for stdout.
pub(crate) fn summarize_run(report: &RunReport) -> String {
    if report.is_noop() {
        return format!("Already at version {}", report.to);
    }
    format!(
        "Migrated {} from version {} to {} ({} migration{})",
        report.direction,
        report.from,
        report.to,
        report.applied.len(),
        if report.applied.len() == 1 { "" } else { "s" }
    )
}

/// Calculate column widths for a table given headers and rows.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Render a left-aligned table: header row, dashed separator, then rows.
///
/// Columns are separated by two spaces.
pub(crate) fn format_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths = calculate_column_widths(headers, rows);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_row(headers, &widths));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(render_row(&cells, &widths));
    }
    lines.join("\n")
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Print a formatted table to stdout.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    println!("{}", format_table(headers, rows));
}
