//! tm-core - Core library for Tidemark
//!
//! This crate holds everything in the migration engine that does not touch a
//! database: the directional script parser, the version resolver that turns a
//! directory of `.sql` files into an ordered batch, scaffold rendering for new
//! migrations, and `dbconf.yml` loading.

pub mod config;
pub mod error;
pub mod resolver;
pub mod scaffold;
pub mod script;

pub use config::{DbConf, DriverName};
pub use error::{CoreError, CoreResult};
pub use resolver::{
    collect_migrations, most_recent_version, numeric_component, previous_version, Migration,
    NO_VERSION,
};
pub use scaffold::{migration_filename, render_scaffold};
pub use script::{
    is_comment_only, load_script, parse_script, Direction, ParsedScript, ScriptWarning,
};
