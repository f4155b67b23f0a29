//! Weather core for a desktop panel applet.
//!
//! This crate defines:
//! - Configuration consumed by each refresh cycle
//! - Unit conversion and the condition-code catalog
//! - Query building and the HTTP fetcher seam
//! - Normalization of the raw API document into a display-ready snapshot
//! - A refresh scheduler that publishes snapshots to the display side
//!
//! It is used by `shell-weather`, but any host that can draw a panel and a
//! popup can drive it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod normalize;
pub mod query;
pub mod scheduler;
pub mod units;

pub use config::{Configuration, HttpConfig, PanelPosition};
pub use error::WeatherError;
pub use fetcher::{HttpWeatherFetcher, WeatherFetcher};
pub use model::{DaySlot, ForecastDay, Pressure, RawWeatherDocument, WeatherSnapshot, Wind};
pub use normalize::normalize;
pub use query::{RequestDescriptor, WeatherQueryBuilder};
pub use scheduler::{IconExists, RefreshOutcome, RefreshScheduler, SchedulerState};
pub use units::{TemperatureUnit, WindSpeedUnit};
