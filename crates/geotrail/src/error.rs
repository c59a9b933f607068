//! Error types for geotrail.
//!
//! Every failure the core can produce is a distinct variant here, so callers
//! can tell a bad coordinate from a denied permission from a broken database.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for geotrail operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Capture Errors ===
    /// A coordinate was not finite or fell outside the geographic range.
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// The rejected latitude.
        latitude: f64,
        /// The rejected longitude.
        longitude: f64,
    },

    /// The user declined access to their location.
    #[error("location permission denied")]
    PermissionDenied,

    /// The location provider could not produce a sample.
    #[error("location provider unavailable: {0}")]
    ProviderUnavailable(String),

    // === Storage Errors ===
    /// Reading from the storage medium failed.
    #[error("storage read failed: {0}")]
    StorageRead(#[source] rusqlite::Error),

    /// Writing to the storage medium failed. Nothing was committed.
    #[error("storage write failed: {0}")]
    StorageWrite(#[source] rusqlite::Error),

    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// The database schema is not one this build understands.
    #[error("database schema error: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for geotrail operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a provider unavailable error.
    #[must_use]
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::ProviderUnavailable(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a permission issue.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }

    /// Check if this error came from the storage medium.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::StorageRead(_) | Self::StorageWrite(_))
    }

    /// Whether retrying the whole operation may succeed.
    ///
    /// Only a transient provider failure qualifies. Bad input, denied
    /// permission and storage failures need something to change first.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_))
    }
}
