//! Scaffolding for new migration files.
//!
//! Rendering is pure; writing the file is left to the caller.

use crate::script::DIRECTIVE_PREFIX;
use chrono::{DateTime, Utc};

/// Timestamp layout used as the version of a new migration.
pub const VERSION_FORMAT: &str = "%Y%m%d%H%M%S";

/// File name for a new migration called `name` created at `timestamp`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use tm_core::scaffold::migration_filename;
/// let ts = Utc.with_ymd_and_hms(2024, 3, 17, 9, 5, 0).unwrap();
/// assert_eq!(migration_filename("add_users", ts), "20240317090500_add_users.sql");
/// ```
pub fn migration_filename(name: &str, timestamp: DateTime<Utc>) -> String {
    format!("{}_{}.sql", timestamp.format(VERSION_FORMAT), name)
}

/// Contents of a new migration file with empty `up` and `down` sections.
pub fn render_scaffold(timestamp: DateTime<Utc>) -> String {
    format!(
        "-- Created: {created}\n\
         \n\
         {prefix}up\n\
         -- SQL in section 'up' is executed when this migration is applied\n\
         \n\
         \n\
         {prefix}down\n\
         -- SQL in section 'down' is executed when this migration is rolled back\n\
         \n",
        created = timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        prefix = DIRECTIVE_PREFIX,
    )
}
