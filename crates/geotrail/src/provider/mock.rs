//! Mock provider implementation for testing.
//!
//! [`MockProvider`] implements [`LocationProvider`] with scriptable
//! behavior:
//!
//! - **Permission control**: grant or deny access
//! - **Failure injection**: make sample requests fail as unavailable
//! - **Latency simulation**: delay sample responses
//! - **Call counting**: check how often each method was hit

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::location::Coordinate;

use super::{LocationProvider, Permission};

/// A scriptable location provider for tests.
#[derive(Debug)]
pub struct MockProvider {
    coordinate: RwLock<Coordinate>,
    granted: AtomicBool,
    should_fail: AtomicBool,
    /// Simulated sample latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    permission_requests: AtomicU32,
    sample_requests: AtomicU32,
}

impl MockProvider {
    /// A mock that grants permission and reports `coordinate`.
    #[must_use]
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate: RwLock::new(coordinate),
            granted: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
            latency_ms: AtomicU64::new(0),
            permission_requests: AtomicU32::new(0),
            sample_requests: AtomicU32::new(0),
        }
    }

    /// A mock that denies permission.
    #[must_use]
    pub fn denied() -> Self {
        let mock = Self::default();
        mock.set_granted(false);
        mock
    }

    /// Change the reported coordinate.
    pub async fn set_coordinate(&self, coordinate: Coordinate) {
        *self.coordinate.write().await = coordinate;
    }

    /// Grant or deny permission on subsequent requests.
    pub fn set_granted(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }

    /// Make subsequent sample requests fail as unavailable.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Delay subsequent sample responses.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Number of permission requests seen.
    #[must_use]
    pub fn permission_requests(&self) -> u32 {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// Number of sample requests seen.
    #[must_use]
    pub fn sample_requests(&self) -> u32 {
        self.sample_requests.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(Coordinate::default())
    }
}

#[async_trait]
impl LocationProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn request_permission(&self) -> Permission {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        if self.granted.load(Ordering::SeqCst) {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn current_coordinate(&self) -> Result<Coordinate> {
        self.sample_requests.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if !self.granted.load(Ordering::SeqCst) {
            return Err(Error::PermissionDenied);
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(Error::provider_unavailable("mock failure"));
        }
        Ok(*self.coordinate.read().await)
    }
}
