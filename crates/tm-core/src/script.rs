//! Directional migration script parser.
//!
//! A migration file carries both its forward and reverse change-sets, tagged
//! with directive lines:
//!
//! ```sql
//! -- +migrate up
//! CREATE TABLE t (id INT);
//!
//! -- +migrate down
//! DROP TABLE t;
//! ```
//!
//! Statements normally end at a line whose last non-comment token ends with
//! `;`. Bodies that contain their own semicolons are wrapped in
//! `-- +migrate statementbegin` / `-- +migrate statementend` and emitted as
//! a single statement.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::path::Path;

/// Prefix shared by every directive line.
pub const DIRECTIVE_PREFIX: &str = "-- +migrate ";

/// Which half of a migration to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply the migration (`up` section)
    Up,
    /// Roll the migration back (`down` section)
    Down,
}

impl Direction {
    /// Direction of a run moving from `current` to `target`.
    ///
    /// Forward only when the target is strictly higher.
    pub fn between(current: i64, target: i64) -> Self {
        if target > current {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Value written to the ledger's `applied` column for this direction.
    pub fn is_up(self) -> bool {
        matches!(self, Direction::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Non-fatal problems found while splitting a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptWarning {
    /// A `statementbegin` was never closed by `statementend`
    UnterminatedStatementBlock,
    /// Content left in the buffer at end of file, usually a missing `;`
    UnfinishedStatement(String),
    /// A directive line with a keyword this parser does not know
    UnknownDirective(String),
}

impl fmt::Display for ScriptWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptWarning::UnterminatedStatementBlock => write!(
                f,
                "saw '{DIRECTIVE_PREFIX}statementbegin' with no matching '{DIRECTIVE_PREFIX}statementend'"
            ),
            ScriptWarning::UnfinishedStatement(sql) => write!(
                f,
                "unexpected unfinished SQL query: {sql}. Missing a semicolon?"
            ),
            ScriptWarning::UnknownDirective(keyword) => write!(
                f,
                "unrecognized directive '{DIRECTIVE_PREFIX}{keyword}' treated as a comment \
                 (directives are lower-case: up, down, statementbegin, statementend)"
            ),
        }
    }
}

/// Statements for one direction of a script, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedScript {
    /// Executable statements, each with its lines newline-terminated
    pub statements: Vec<String>,
    /// Problems that did not stop parsing
    pub warnings: Vec<ScriptWarning>,
}

enum Directive {
    Up,
    Down,
    StatementBegin,
    StatementEnd,
}

impl Directive {
    fn parse(line: &str) -> Option<Result<Self, String>> {
        let keyword = line.strip_prefix(DIRECTIVE_PREFIX)?.trim();
        Some(match keyword {
            "up" => Ok(Directive::Up),
            "down" => Ok(Directive::Down),
            "statementbegin" => Ok(Directive::StatementBegin),
            "statementend" => Ok(Directive::StatementEnd),
            other => Err(other.to_string()),
        })
    }
}

/// Check whether a line closes a statement.
///
/// Tokens are split on whitespace; the scan stops at the first token that
/// starts a `--` comment, and the last token before it must end with `;`.
pub fn ends_with_semicolon(line: &str) -> bool {
    line.split_whitespace()
        .take_while(|word| !word.starts_with("--"))
        .last()
        .is_some_and(|word| word.ends_with(';'))
}

/// True when every line is blank or a `--` comment.
pub fn is_comment_only(sql: &str) -> bool {
    sql.lines().all(|l| {
        let t = l.trim();
        t.is_empty() || t.starts_with("--")
    })
}

/// Split `text` into the statements of one direction.
///
/// Fails only when the script has no `up` and no `down` directive at all;
/// everything else that looks wrong is reported in
/// [`ParsedScript::warnings`].
pub fn parse_script(text: &str, direction: Direction) -> CoreResult<ParsedScript> {
    let mut parsed = ParsedScript::default();
    let mut buf = String::new();

    let mut up_sections = 0usize;
    let mut down_sections = 0usize;

    let mut active = false;
    let mut in_block = false;

    for line in text.lines() {
        match Directive::parse(line) {
            Some(Ok(directive)) => {
                match directive {
                    Directive::Up => {
                        active = direction == Direction::Up;
                        up_sections += 1;
                    }
                    Directive::Down => {
                        active = direction == Direction::Down;
                        down_sections += 1;
                    }
                    Directive::StatementBegin => {
                        if active {
                            in_block = true;
                        }
                    }
                    Directive::StatementEnd => {
                        if active && in_block {
                            in_block = false;
                            parsed.statements.push(std::mem::take(&mut buf));
                        }
                    }
                }
                continue;
            }
            Some(Err(keyword)) => {
                log::debug!("ignoring unknown directive '{keyword}'");
                parsed.warnings.push(ScriptWarning::UnknownDirective(keyword));
            }
            None => {}
        }

        if !active {
            continue;
        }

        buf.push_str(line);
        buf.push('\n');

        if !in_block && ends_with_semicolon(line) {
            parsed.statements.push(std::mem::take(&mut buf));
        }
    }

    if up_sections == 0 && down_sections == 0 {
        return Err(CoreError::AnnotationMissing {
            path: "<script>".to_string(),
        });
    }

    if in_block {
        parsed.warnings.push(ScriptWarning::UnterminatedStatementBlock);
    }

    let remaining = buf.trim();
    if !remaining.is_empty() && !is_comment_only(remaining) {
        parsed
            .warnings
            .push(ScriptWarning::UnfinishedStatement(remaining.to_string()));
    }

    Ok(parsed)
}

/// Read a migration file and split it for `direction`.
///
/// Warnings are logged against the file name before returning.
pub fn load_script(path: &Path, direction: Direction) -> CoreResult<ParsedScript> {
    let text = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;

    let parsed = parse_script(&text, direction).map_err(|e| match e {
        CoreError::AnnotationMissing { .. } => CoreError::AnnotationMissing {
            path: path.display().to_string(),
        },
        other => other,
    })?;

    for warning in &parsed.warnings {
        log::warn!("{}: {}", path.display(), warning);
    }
    Ok(parsed)
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
