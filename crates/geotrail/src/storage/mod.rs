//! Storage layer for geotrail.
//!
//! This module provides the `SQLite` medium shared by the location log and
//! the preference store. All database work is handed to tokio's blocking pool
//! so async callers are suspended, not blocked, while `SQLite` runs.

mod locations;
mod preferences;
pub mod schema;
pub mod version;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use locations::LocationStore;
pub use preferences::{PreferenceStore, DARK_MODE};

/// Path reported for in-memory databases.
const MEMORY_PATH: &str = ":memory:";

/// Handle to the on-device database.
///
/// Cloning is cheap; every clone talks to the same connection. There is a
/// single writer, and the mutex only exists so the connection can move into
/// the blocking pool.
#[derive(Debug, Clone)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, or if it carries a
    /// schema version this build does not support.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Refuse a foreign schema before the pragmas or DDL below change the file.
        version::check_schema_version(&conn)?;

        // FULL sync: a committed capture must survive power loss, not just a crash.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")
            .map_err(|source| Error::DatabaseOpen {
                path: path.clone(),
                source,
            })?;

        version::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self::from_connection(path, conn))
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        version::initialize_schema(&conn)?;

        Ok(Self::from_connection(PathBuf::from(MEMORY_PATH), conn))
    }

    fn from_connection(path: PathBuf, conn: Connection) -> Self {
        Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The append-only location log on this database.
    #[must_use]
    pub fn locations(&self) -> LocationStore {
        LocationStore::new(self.clone())
    }

    /// The preference store on this database.
    #[must_use]
    pub fn preferences(&self) -> PreferenceStore {
        PreferenceStore::new(self.clone())
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the database cannot be queried.
    pub async fn stats(&self) -> Result<StorageStats> {
        let (total_locations, oldest, newest) = self
            .read(|conn| {
                conn.query_row(
                    "SELECT COUNT(*), MIN(captured_at), MAX(captured_at) FROM locations",
                    [],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, Option<i64>>(1)?,
                            row.get::<_, Option<i64>>(2)?,
                        ))
                    },
                )
            })
            .await?;

        let db_size_bytes = if self.path.as_os_str() == MEMORY_PATH {
            0
        } else {
            tokio::fs::metadata(&self.path)
                .await
                .map(|m| m.len())
                .unwrap_or(0)
        };

        Ok(StorageStats {
            total_locations: u64::try_from(total_locations).unwrap_or_default(),
            oldest_capture: oldest.and_then(DateTime::from_timestamp_millis),
            newest_capture: newest.and_then(DateTime::from_timestamp_millis),
            db_size_bytes,
        })
    }

    /// Run a read-only query on the blocking pool.
    ///
    /// Any failure surfaces as [`Error::StorageRead`].
    pub(crate) async fn read<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run(Error::StorageRead, move |conn| op(conn)).await
    }

    /// Run a mutating operation on the blocking pool.
    ///
    /// Any failure surfaces as [`Error::StorageWrite`]. Operations that need
    /// several statements should open a transaction on the connection so a
    /// failure leaves nothing behind.
    pub(crate) async fn write<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run(Error::StorageWrite, op).await
    }

    async fn run<T, F>(&self, classify: fn(rusqlite::Error) -> Error, op: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| task_failure("database connection lock poisoned"))?;
            op(&mut guard)
        })
        .await
        .map_err(|e| task_failure(format!("storage task failed: {e}")))
        .and_then(|result| result)
        .map_err(classify)
    }
}

/// A failure of the blocking task itself rather than of `SQLite`.
fn task_failure(message: impl Into<String>) -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_INTERNAL),
        Some(message.into()),
    )
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Total number of location records stored.
    pub total_locations: u64,
    /// Timestamp of the oldest capture.
    pub oldest_capture: Option<DateTime<Utc>>,
    /// Timestamp of the newest capture.
    pub newest_capture: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("geotrail_{tag}_{}.db", std::process::id()))
    }

    fn remove_db(path: &Path) {
        let _ = std::fs::remove_file(path);
        let _ = std::fs::remove_file(path.with_extension("db-wal"));
        let _ = std::fs::remove_file(path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_path() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let storage = Storage::open_in_memory().unwrap();
        let stats = storage.stats().await.unwrap();

        assert_eq!(stats.total_locations, 0);
        assert!(stats.oldest_capture.is_none());
        assert!(stats.newest_capture.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[tokio::test]
    async fn test_stats_with_data() {
        let storage = Storage::open_in_memory().unwrap();
        let locations = storage.locations();
        let first = locations.insert(1.0, 2.0).await.unwrap();
        let second = locations.insert(3.0, 4.0).await.unwrap();

        let stats = storage.stats().await.unwrap();
        assert_eq!(stats.total_locations, 2);
        assert_eq!(stats.oldest_capture, Some(first.captured_at));
        assert_eq!(stats.newest_capture, Some(second.captured_at));
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let db_path = temp_db_path("reopen");
        remove_db(&db_path);

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.locations().insert(-23.55, -46.63).await.unwrap();
            storage.preferences().set_bool(DARK_MODE, true).await.unwrap();
            assert!(storage.stats().await.unwrap().db_size_bytes > 0);
        }

        let storage = Storage::open(&db_path).unwrap();
        let records = storage.locations().list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 1);
        assert!(storage.preferences().dark_mode().await.unwrap());

        drop(storage);
        remove_db(&db_path);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_reopen() {
        let db_path = temp_db_path("ids");
        remove_db(&db_path);

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.locations().insert(0.0, 0.0).await.unwrap();
            storage.locations().insert(0.0, 0.0).await.unwrap();
        }

        let storage = Storage::open(&db_path).unwrap();
        let third = storage.locations().insert(0.0, 0.0).await.unwrap();
        assert_eq!(third.id, 3);

        drop(storage);
        remove_db(&db_path);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let nested_path = std::env::temp_dir().join(format!(
            "geotrail_test_{}/nested/db.sqlite",
            std::process::id()
        ));

        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(storage);
        if let Some(parent) = nested_path.parent().and_then(Path::parent) {
            let _ = std::fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn test_open_unsupported_schema_version() {
        let db_path = temp_db_path("version");
        remove_db(&db_path);

        {
            let conn = Connection::open(&db_path).unwrap();
            version::initialize_schema(&conn).unwrap();
            conn.execute(
                "UPDATE metadata SET value = '99' WHERE key = 'schema_version'",
                [],
            )
            .unwrap();
        }

        let err = Storage::open(&db_path).unwrap_err();
        assert!(matches!(err, Error::DatabaseMigration { .. }));

        remove_db(&db_path);
    }

    #[test]
    fn test_rejected_open_leaves_database_untouched() {
        let db_path = temp_db_path("foreign");
        remove_db(&db_path);

        {
            let conn = Connection::open(&db_path).unwrap();
            conn.execute_batch(
                "CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL);
                 INSERT INTO metadata (key, value) VALUES ('schema_version', '2');",
            )
            .unwrap();
        }

        let err = Storage::open(&db_path).unwrap_err();
        assert!(err.to_string().contains("schema version 2"));

        let conn = Connection::open(&db_path).unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(tables, vec!["metadata".to_string()]);

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode, "delete");

        drop(conn);
        remove_db(&db_path);
    }

    #[tokio::test]
    async fn test_poisoned_connection_keeps_error_classification() {
        let storage = Storage::open_in_memory().unwrap();
        let conn = Arc::clone(&storage.conn);
        let _ = std::thread::spawn(move || {
            let _guard = conn.lock().unwrap();
            panic!("poison the connection lock");
        })
        .join();

        let err = storage.locations().insert(1.0, 2.0).await.unwrap_err();
        assert!(matches!(err, Error::StorageWrite(_)));

        let err = storage.locations().list_all().await.unwrap_err();
        assert!(matches!(err, Error::StorageRead(_)));
    }

    #[test]
    fn test_storage_stats_clone() {
        let stats = StorageStats {
            total_locations: 5,
            oldest_capture: None,
            newest_capture: None,
            db_size_bytes: 512,
        };
        let cloned = stats.clone();
        assert_eq!(stats, cloned);
    }
}
