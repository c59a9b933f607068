//! Capturing the current position into the location log.
//!
//! A capture is two awaits in sequence: one on the provider, then one on the
//! store. Nothing is written unless the provider produced a valid sample, and
//! a failed write is never retried.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::location::LocationRecord;
use crate::provider::LocationProvider;
use crate::storage::LocationStore;

/// Default time allowed for the provider to produce a sample.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Takes one sample from a provider and appends it to the location log.
///
/// Callers must let one [`Self::capture`] finish before starting the next.
/// A capture abandoned mid-flight may still complete its write.
#[derive(Debug)]
pub struct CaptureController<P> {
    provider: P,
    locations: LocationStore,
    provider_timeout: Duration,
}

impl<P: LocationProvider> CaptureController<P> {
    /// Create a controller writing to `locations`.
    #[must_use]
    pub fn new(provider: P, locations: LocationStore) -> Self {
        Self {
            provider,
            locations,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Bound how long the provider may take to produce a sample.
    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// The provider this controller samples from.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Capture the current position.
    ///
    /// # Errors
    ///
    /// - [`Error::PermissionDenied`] if the user declined location access.
    /// - [`Error::ProviderUnavailable`] if no sample arrived in time.
    /// - [`Error::StorageWrite`] if the record could not be committed.
    ///
    /// On any error no record is added.
    pub async fn capture(&self) -> Result<LocationRecord> {
        let provider = self.provider.name();

        if !self.provider.request_permission().await.is_granted() {
            warn!("Location permission denied by {} provider", provider);
            return Err(Error::PermissionDenied);
        }

        let coordinate =
            match tokio::time::timeout(self.provider_timeout, self.provider.current_coordinate())
                .await
            {
                Ok(Ok(coordinate)) => coordinate,
                Ok(Err(e)) => {
                    warn!("{} provider failed: {}", provider, e);
                    return Err(e);
                }
                Err(_) => {
                    warn!(
                        "{} provider timed out after {:?}",
                        provider, self.provider_timeout
                    );
                    return Err(Error::provider_unavailable(format!(
                        "no sample within {:?}",
                        self.provider_timeout
                    )));
                }
            };
        debug!(
            "Sampled ({}, {}) from {} provider",
            coordinate.latitude(),
            coordinate.longitude(),
            provider
        );

        let record = self.locations.insert_coordinate(coordinate).await.map_err(|e| {
            warn!("Discarding sample, write failed: {}", e);
            e
        })?;

        info!("Captured location {}", record.id);
        Ok(record)
    }
}
