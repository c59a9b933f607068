//! Schema initialization and version stamping.
//!
//! The schema is fixed. A fresh database is stamped with
//! [`SCHEMA_VERSION`]; an existing one must carry that exact stamp or the
//! open is refused before anything in it is touched.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The schema version this build reads and writes.
pub const SCHEMA_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Check that the database is fresh or carries [`SCHEMA_VERSION`].
///
/// Only reads; a rejected database is left exactly as it was found.
///
/// # Errors
///
/// Returns [`Error::DatabaseMigration`] if the database was written by a
/// different schema version.
pub fn check_schema_version(conn: &Connection) -> Result<Option<i32>> {
    match get_schema_version(conn)? {
        Some(found) if found != SCHEMA_VERSION => Err(Error::DatabaseMigration {
            message: format!(
                "database has schema version {found}, this build supports {SCHEMA_VERSION}"
            ),
        }),
        version => Ok(version),
    }
}

/// Initialize the database schema.
///
/// Checks the version first, then creates all tables if they don't exist and
/// stamps a fresh database with the current version.
///
/// # Errors
///
/// Returns [`Error::DatabaseMigration`] if the database was written by a
/// different schema version, and [`Error::StorageWrite`] if the tables cannot
/// be created.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let version = check_schema_version(conn)?;

    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, []).map_err(Error::StorageWrite)?;
    }

    if version.is_none() {
        set_schema_version(conn, SCHEMA_VERSION)?;
    }
    Ok(())
}

/// Get the schema version recorded in the database, if any.
///
/// A database without a `metadata` table is fresh.
fn get_schema_version(conn: &Connection) -> Result<Option<i32>> {
    let has_metadata: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
            [],
            |row| row.get(0),
        )
        .map_err(Error::StorageRead)?;
    if !has_metadata {
        return Ok(None);
    }

    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::StorageRead)?;

    value
        .map(|v| {
            v.parse().map_err(|_| Error::DatabaseMigration {
                message: format!("invalid schema version: {v}"),
            })
        })
        .transpose()
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )
    .map_err(Error::StorageWrite)?;
    Ok(())
}
