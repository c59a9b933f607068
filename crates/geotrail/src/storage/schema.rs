//! `SQLite` schema definitions for geotrail.
//!
//! This module contains the SQL statements for creating the database schema.

/// SQL statement to create the locations table.
///
/// `AUTOINCREMENT` keeps ids from being reused even if rows were ever removed
/// out of band.
pub const CREATE_LOCATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    captured_at INTEGER NOT NULL
)
";

/// SQL statement to create the preferences table.
pub const CREATE_PREFERENCES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS preferences (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_LOCATIONS_TABLE,
    CREATE_PREFERENCES_TABLE,
    CREATE_METADATA_TABLE,
];
