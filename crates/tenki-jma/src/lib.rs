//! Japan Meteorological Agency forecast access for Tenki.
//!
//! Provides the area directory and forecast clients plus a SQLite store
//! for browsing previously fetched forecasts offline.

pub mod cache;
pub mod client;
pub mod error;
pub mod types;

pub use cache::ForecastStore;
pub use client::JmaClient;
pub use error::JmaError;
pub use types::{parse_area_directory, parse_forecast, Area, AreaDirectory, ForecastEntry, StoredForecast};
