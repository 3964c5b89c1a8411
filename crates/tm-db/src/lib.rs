//! tm-db - Database layer for Tidemark
//!
//! Owns everything that talks to the target database: opening a DuckDB
//! connection from [`tm_core::DbConf`], the append-only `db_version` ledger,
//! and the driver that applies a resolved batch one transaction at a time.

pub mod connection;
pub mod driver;
pub mod error;
pub mod ledger;

pub use connection::Database;
pub use driver::{run, run_with_config, RunReport};
pub use error::{DbError, DbResult};
pub use ledger::{current_version, ensure_initialized, ensure_version, history, LedgerEntry};
