//! Location provider abstraction.
//!
//! The core never talks to a device API directly. It asks a
//! [`LocationProvider`] for permission and then for one coordinate sample.

mod mock;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::location::Coordinate;

pub use mock::MockProvider;

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// The user allowed location access.
    Granted,
    /// The user declined location access.
    Denied,
}

impl Permission {
    /// Whether access was granted.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A source of the device's current position.
///
/// Implementors wrap whatever positioning facility the platform offers.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// The name of this provider (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Ask the user for location access.
    async fn request_permission(&self) -> Permission;

    /// Produce one coordinate sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PermissionDenied`] if access was revoked and
    /// [`Error::ProviderUnavailable`] if no fix could be obtained.
    async fn current_coordinate(&self) -> Result<Coordinate>;
}

/// A provider that always reports the same position.
///
/// Used when the position comes from the user rather than from hardware,
/// e.g. the CLI's `--lat`/`--lon` flags or the `[provider]` config section.
#[derive(Debug, Clone, Default)]
pub struct FixedProvider {
    coordinate: Option<Coordinate>,
}

impl FixedProvider {
    /// A provider reporting `coordinate`.
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
        }
    }

    /// A provider with no position configured. Every sample request fails
    /// with [`Error::ProviderUnavailable`].
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    async fn current_coordinate(&self) -> Result<Coordinate> {
        self.coordinate
            .ok_or_else(|| Error::provider_unavailable("no position configured"))
    }
}
