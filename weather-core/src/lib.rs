//! Core library for the `weather` lookup CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The OpenWeather API provider
//! - City-name resolution with fuzzy matching and interactive disambiguation
//! - Normalization of current conditions and day-bucketing of forecasts
//!
//! It is used by `weather-lookup-cli`, but can also be reused by other binaries.

pub mod catalog;
pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod resolve;
pub mod service;
pub mod units;
pub mod wind;

pub use catalog::CityCatalog;
pub use config::Config;
pub use error::{ChoiceError, ComparisonSide, WeatherError};
pub use forecast::{DayOutlook, ForecastDayBucket, ForecastEntry};
pub use model::{ApiStatus, RawApiPayload, ResolvedQuery, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
pub use resolve::{InputPolicy, Resolver, UserInteraction};
pub use service::{ComparisonFeature, ComparisonReport, CurrentReport, ForecastReport, WeatherService};
pub use units::TemperatureUnit;
