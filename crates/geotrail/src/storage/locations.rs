//! The append-only location log.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};
use crate::location::{Coordinate, LocationRecord};

use super::Storage;

const SELECT_RECORD: &str = "SELECT id, latitude, longitude, captured_at FROM locations";

/// Durable, append-only collection of [`LocationRecord`]s.
///
/// Records are only ever inserted. Ids come from `SQLite`'s `AUTOINCREMENT`,
/// so they increase with insertion order and are never handed out twice.
#[derive(Debug, Clone)]
pub struct LocationStore {
    storage: Storage,
}

impl LocationStore {
    /// Create a location store on the given storage.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Append a new record at the given position.
    ///
    /// The store assigns the id and the capture time. Once this returns `Ok`
    /// the record is committed and visible to [`Self::list_all`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] without touching the database if
    /// the position is out of range, and [`Error::StorageWrite`] if the
    /// insert could not be committed. In both cases no record is added.
    pub async fn insert(&self, latitude: f64, longitude: f64) -> Result<LocationRecord> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        self.insert_coordinate(coordinate).await
    }

    /// Append a new record for an already validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the insert could not be committed.
    pub async fn insert_coordinate(&self, coordinate: Coordinate) -> Result<LocationRecord> {
        let captured_at = now_millis()?;
        let latitude = coordinate.latitude();
        let longitude = coordinate.longitude();

        let id = self
            .storage
            .write(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO locations (latitude, longitude, captured_at) VALUES (?1, ?2, ?3)",
                    params![latitude, longitude, captured_at.timestamp_millis()],
                )?;
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(id)
            })
            .await?;

        debug!("Inserted location {} at ({}, {})", id, latitude, longitude);
        Ok(LocationRecord {
            id,
            latitude,
            longitude,
            captured_at,
        })
    }

    /// Every stored record, oldest first.
    ///
    /// An empty store yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the database cannot be queried.
    pub async fn list_all(&self) -> Result<Vec<LocationRecord>> {
        self.storage
            .read(|conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_RECORD} ORDER BY id ASC"))?;
                let records = stmt
                    .query_map([], row_to_record)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(records)
            })
            .await
    }

    /// Get a record by its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the database cannot be queried.
    pub async fn get(&self, id: i64) -> Result<Option<LocationRecord>> {
        self.storage
            .read(move |conn| {
                conn.query_row(&format!("{SELECT_RECORD} WHERE id = ?1"), [id], row_to_record)
                    .optional()
            })
            .await
    }

    /// The most recently inserted record, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the database cannot be queried.
    pub async fn latest(&self) -> Result<Option<LocationRecord>> {
        self.storage
            .read(|conn| {
                conn.query_row(
                    &format!("{SELECT_RECORD} ORDER BY id DESC LIMIT 1"),
                    [],
                    row_to_record,
                )
                .optional()
            })
            .await
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the database cannot be queried.
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = self
            .storage
            .read(|conn| conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0)))
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

/// Current time truncated to what the database stores.
///
/// The returned record must compare equal to the one read back later.
fn now_millis() -> Result<DateTime<Utc>> {
    let millis = Utc::now().timestamp_millis();
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| Error::internal(format!("clock out of range: {millis}")))
}

/// Convert a database row to a `LocationRecord`.
fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<LocationRecord> {
    let millis: i64 = row.get(3)?;
    let captured_at = DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(3, millis))?;

    Ok(LocationRecord {
        id: row.get(0)?,
        latitude: row.get(1)?,
        longitude: row.get(2)?,
        captured_at,
    })
}
