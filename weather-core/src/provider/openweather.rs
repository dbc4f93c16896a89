use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{error::WeatherError, model::RawApiPayload};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        connect_timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().connect_timeout(connect_timeout).build()?;

        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// GET an endpoint and return its JSON body whatever the HTTP status.
    async fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<RawApiPayload, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;
        tracing::debug!(%status, endpoint, "OpenWeather responded");

        serde_json::from_str(&body).map_err(|err| {
            tracing::warn!(%status, body = %truncate_body(&body), "OpenWeather body is not JSON");
            WeatherError::MalformedPayload(err)
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<RawApiPayload, WeatherError> {
        self.fetch("weather", &[("q", city)]).await
    }

    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<RawApiPayload, WeatherError> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        self.fetch("forecast", &[("lat", lat.as_str()), ("lon", lon.as_str())]).await
    }
}

fn transport_error(err: reqwest::Error) -> WeatherError {
    if err.is_timeout() {
        tracing::warn!(error = %err, "OpenWeather request timed out");
        WeatherError::ConnectTimeout
    } else {
        WeatherError::Transport(err)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
