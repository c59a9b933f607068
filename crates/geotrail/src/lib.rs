//! `geotrail` - An append-only local history of captured geographic positions
//!
//! This library provides the persistence core for capturing the current
//! position from a location provider, storing it durably, reading the history
//! back, and keeping the user's display preferences.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod provider;
pub mod query;
pub mod storage;
pub mod theme;

pub use capture::CaptureController;
pub use config::Config;
pub use error::{Error, Result};
pub use location::{Coordinate, LocationRecord};
pub use logging::init_logging;
pub use provider::{FixedProvider, LocationProvider, MockProvider, Permission};
pub use query::QueryFacade;
pub use storage::{LocationStore, PreferenceStore, Storage, StorageStats, DARK_MODE};
pub use theme::{derive_theme, ThemePalette};
