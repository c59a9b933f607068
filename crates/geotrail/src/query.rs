//! Read path for presentation code.

use crate::error::Result;
use crate::location::LocationRecord;
use crate::storage::LocationStore;

/// The single read entry point for presentation code.
///
/// Callers list history through this type instead of touching the store.
#[derive(Debug, Clone)]
pub struct QueryFacade {
    locations: LocationStore,
}

impl QueryFacade {
    /// Create a facade over `locations`.
    #[must_use]
    pub fn new(locations: LocationStore) -> Self {
        Self { locations }
    }

    /// Every stored record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::StorageRead`] if the database cannot be queried.
    pub async fn list_all(&self) -> Result<Vec<LocationRecord>> {
        self.locations.list_all().await
    }
}
