use crate::{Config, error::WeatherError, model::RawApiPayload, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Outbound weather API.
///
/// Logical failures (unknown city, malformed query) come back as a payload whose
/// `cod` field says so; only transport problems are returned as errors.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<RawApiPayload, WeatherError>;

    async fn forecast(&self, latitude: f64, longitude: f64)
    -> Result<RawApiPayload, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let provider =
        OpenWeatherProvider::new(api_key, &config.base_url, config.connect_timeout())?;

    Ok(Box::new(provider))
}
