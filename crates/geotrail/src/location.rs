//! Core location types for geotrail.
//!
//! This module defines the validated coordinate pair handed around by
//! providers and the immutable record the storage layer hands back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A latitude/longitude pair known to be finite and in range.
///
/// The default is `(0, 0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting anything outside the geographic range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if either value is NaN, infinite,
    /// or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        // RangeInclusive::contains is false for NaN, and infinities are out of range.
        if LATITUDE_RANGE.contains(&latitude) && LONGITUDE_RANGE.contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A stored location capture.
///
/// Records are created only by the storage layer and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Identifier assigned by the store; increases with insertion order.
    pub id: i64,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,

    /// When the store committed this record.
    pub captured_at: DateTime<Utc>,
}

impl LocationRecord {
    /// The record's position as a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if the stored values are out of
    /// range, which only happens if the database was edited by hand.
    pub fn coordinate(&self) -> Result<Coordinate> {
        Coordinate::new(self.latitude, self.longitude)
    }
}
