//! Named boolean preferences.

use chrono::Utc;
use rusqlite::{params, types::Type, OptionalExtension};
use tracing::debug;

use crate::error::Result;

use super::Storage;

/// Name of the dark-mode preference.
pub const DARK_MODE: &str = "darkMode";

/// Durable store of named boolean preferences in one flat namespace.
///
/// Values are stored as JSON booleans. A missing name is not an error; the
/// caller's default is returned instead.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    storage: Storage,
}

impl PreferenceStore {
    /// Create a preference store on the given storage.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Read a boolean preference, falling back to `default` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageRead`] if the database cannot be
    /// queried or the stored value is not a boolean.
    pub async fn get_bool(&self, name: &str, default: bool) -> Result<bool> {
        let name = name.to_owned();
        let stored = self
            .storage
            .read(move |conn| {
                conn.query_row(
                    "SELECT value FROM preferences WHERE name = ?1",
                    [&name],
                    |row| {
                        let raw: String = row.get(0)?;
                        serde_json::from_str::<bool>(&raw).map_err(|e| {
                            rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
                        })
                    },
                )
                .optional()
            })
            .await?;

        Ok(stored.unwrap_or(default))
    }

    /// Persist a boolean preference, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageWrite`] if the value could not be
    /// committed; the previous value stays in effect.
    pub async fn set_bool(&self, name: &str, value: bool) -> Result<()> {
        let key = name.to_owned();
        let updated_at = Utc::now().timestamp_millis();

        self.storage
            .write(move |conn| {
                conn.execute(
                    r"
                    INSERT INTO preferences (name, value, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(name) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at
                    ",
                    params![key, value.to_string(), updated_at],
                )
            })
            .await?;

        debug!("Set preference {} = {}", name, value);
        Ok(())
    }

    /// Invert a boolean preference and persist it, returning the new value.
    ///
    /// An absent preference is treated as `default` before inverting.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageRead`] or [`crate::Error::StorageWrite`]
    /// if either step fails. A failed write leaves the old value in place.
    pub async fn toggle_bool(&self, name: &str, default: bool) -> Result<bool> {
        let value = !self.get_bool(name, default).await?;
        self.set_bool(name, value).await?;
        Ok(value)
    }

    /// Whether dark mode is enabled. Defaults to `false`.
    ///
    /// # Errors
    ///
    /// See [`Self::get_bool`].
    pub async fn dark_mode(&self) -> Result<bool> {
        self.get_bool(DARK_MODE, false).await
    }

    /// Persist the dark-mode flag.
    ///
    /// # Errors
    ///
    /// See [`Self::set_bool`].
    pub async fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.set_bool(DARK_MODE, enabled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let prefs = create_test_storage().preferences();
        prefs.set_bool(DARK_MODE, true).await.unwrap();
        assert!(prefs.get_bool(DARK_MODE, false).await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_key_returns_default() {
        let prefs = create_test_storage().preferences();
        assert!(!prefs.get_bool("missingKey", false).await.unwrap());
        assert!(prefs.get_bool("missingKey", true).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let prefs = create_test_storage().preferences();
        prefs.set_bool(DARK_MODE, true).await.unwrap();
        prefs.set_bool(DARK_MODE, false).await.unwrap();
        assert!(!prefs.get_bool(DARK_MODE, true).await.unwrap());
    }

    #[tokio::test]
    async fn test_names_are_independent() {
        let prefs = create_test_storage().preferences();
        prefs.set_bool("a", true).await.unwrap();
        prefs.set_bool("b", false).await.unwrap();

        assert!(prefs.get_bool("a", false).await.unwrap());
        assert!(!prefs.get_bool("b", true).await.unwrap());
    }

    #[tokio::test]
    async fn test_value_stored_as_json_boolean() {
        let storage = create_test_storage();
        storage.preferences().set_bool(DARK_MODE, true).await.unwrap();

        let raw: String = storage
            .read(|conn| {
                conn.query_row(
                    "SELECT value FROM preferences WHERE name = ?1",
                    [DARK_MODE],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(raw, "true");
    }

    #[tokio::test]
    async fn test_corrupt_value_is_read_error() {
        let storage = create_test_storage();
        storage
            .write(|conn| {
                conn.execute(
                    "INSERT INTO preferences (name, value, updated_at) VALUES (?1, 'yes please', 0)",
                    [DARK_MODE],
                )
            })
            .await
            .unwrap();

        let err = storage.preferences().dark_mode().await.unwrap_err();
        assert!(matches!(err, Error::StorageRead(_)));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_value() {
        let storage = create_test_storage();
        let prefs = storage.preferences();
        prefs.set_dark_mode(true).await.unwrap();

        storage
            .write(|conn| conn.execute_batch("PRAGMA query_only = ON"))
            .await
            .unwrap();

        let err = prefs.set_dark_mode(false).await.unwrap_err();
        assert!(matches!(err, Error::StorageWrite(_)));
        assert!(prefs.dark_mode().await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle() {
        let prefs = create_test_storage().preferences();

        assert!(prefs.toggle_bool(DARK_MODE, false).await.unwrap());
        assert!(prefs.dark_mode().await.unwrap());

        assert!(!prefs.toggle_bool(DARK_MODE, false).await.unwrap());
        assert!(!prefs.dark_mode().await.unwrap());
    }

    #[tokio::test]
    async fn test_dark_mode_defaults_off() {
        let prefs = create_test_storage().preferences();
        assert!(!prefs.dark_mode().await.unwrap());
    }
}
