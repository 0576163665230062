//! Core library for the `skycast` weather display.
//!
//! This crate defines:
//! - The weather data model and its alignment invariants
//! - Location acquisition (permission gate + single position fix)
//! - Clients for the forecast and reverse-geocoding endpoints
//! - The pure view renderer and its UI update commands
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod render;

pub use config::{Config, StoredLocation};
pub use error::{FetchError, LocationError, PipelineError};
pub use forecast::ForecastClient;
pub use geocode::{GeocodeClient, UNKNOWN_LOCATION};
pub use location::{FixedProvider, LocationProvider, PermissionStatus, acquire_fix};
pub use model::{Coordinates, WeatherSnapshot};
pub use render::{UiTarget, UiUpdate, render};
