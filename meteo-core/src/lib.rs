//! Core library for the `meteo` lookup tools.
//!
//! This crate defines:
//! - Configuration handling (endpoints, language, result count)
//! - Place-name search against the Open-Meteo geocoding API
//! - Weather snapshots from the Open-Meteo forecast API
//! - The WMO weather-code description table
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod forecast;
pub mod geocoding;
pub mod model;

pub use config::Config;
pub use forecast::{ForecastClient, WeatherLookup, describe_weather_code};
pub use geocoding::{GeocodingClient, LocationSearch};
pub use model::{
    GeoLocation, LookupError, LookupState, WeatherCurrent, WeatherDaily, WeatherSnapshot,
};
