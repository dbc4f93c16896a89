use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{catalog::title_case, error::WeatherError, units::kelvin_to_celsius};

/// Untyped JSON body returned by the weather API.
pub type RawApiPayload = Value;

/// Logical outcome encoded in the payload's `cod` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Success,
    BadRequest,
    NotFound,
}

impl ApiStatus {
    /// Classify a payload; `cod` may arrive as a number or a string.
    pub fn of(payload: &RawApiPayload) -> Self {
        match status_code(payload) {
            Some(400) => ApiStatus::BadRequest,
            Some(404) => ApiStatus::NotFound,
            _ => ApiStatus::Success,
        }
    }
}

/// Numeric `cod` of a payload, if present.
pub fn status_code(payload: &RawApiPayload) -> Option<u16> {
    match payload.get("cod") {
        Some(Value::String(s)) => s.trim().parse::<u16>().ok(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        _ => None,
    }
}

/// Outcome of resolving a user-typed city name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedQuery {
    /// `None` when the city could not be resolved.
    pub payload: Option<RawApiPayload>,
    pub city: String,
}

impl ResolvedQuery {
    pub fn resolved(payload: RawApiPayload, city: impl Into<String>) -> Self {
        Self { payload: Some(payload), city: city.into() }
    }

    pub fn unresolved(city: impl Into<String>) -> Self {
        Self { payload: None, city: city.into() }
    }

    pub fn is_resolved(&self) -> bool {
        self.payload.is_some()
    }

    /// City name formatted for display.
    pub fn display_name(&self) -> String {
        title_case(self.city.trim())
    }
}

/// Display-ready current conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub status: String,
    pub description: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: i32,
}

impl WeatherSnapshot {
    /// Extract the snapshot from a payload already known to be successful.
    ///
    /// When the fields are missing and the payload carries a non-2xx `cod`
    /// (an invalid API key, say), the API's own message is kept in
    /// [`WeatherError::ApiRejected`].
    pub fn normalize(payload: &RawApiPayload) -> Result<Self, WeatherError> {
        let parsed = OwCurrentResponse::deserialize(payload).map_err(|err| rejection(payload, err))?;
        let condition = parsed.weather.into_iter().next().ok_or_else(|| {
            <serde_json::Error as serde::de::Error>::custom("weather list is empty")
        })?;

        Ok(Self {
            status: condition.main,
            description: title_case(&condition.description),
            temperature_c: kelvin_to_celsius(parsed.main.temp),
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            wind_direction_deg: parsed.wind.deg,
        })
    }

    pub fn adjective(&self) -> String {
        weather_adjective(&self.status)
    }
}

fn rejection(payload: &RawApiPayload, err: serde_json::Error) -> WeatherError {
    match status_code(payload).filter(|code| !(200..300).contains(code)) {
        Some(code) => {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            tracing::warn!(code, %message, "weather API reported an error");
            WeatherError::ApiRejected { code, message }
        }
        None => WeatherError::MalformedPayload(err),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn from_payload(payload: &RawApiPayload) -> Result<Self, WeatherError> {
        #[derive(Deserialize)]
        struct WithCoord {
            coord: Coordinates,
        }
        Ok(WithCoord::deserialize(payload)?.coord)
    }
}

/// Everyday adjective for an OpenWeather condition keyword.
pub fn weather_adjective(keyword: &str) -> String {
    let adjective = match keyword {
        "Clear" => "sunny",
        "Clouds" => "cloudy",
        "Drizzle" => "drizzly",
        "Rain" => "rainy",
        "Thunderstorm" => "stormy",
        "Snow" => "snowy",
        "Mist" => "misty",
        "Smoke" => "smokey",
        "Haze" => "hazy",
        "Dust" => "dusty",
        "Fog" => "foggy",
        "Sand" => "sandy",
        "Ash" => "ashy",
        "Squall" => "squally",
        "Tornado" => "being hit with a tornado",
        other => return other.to_lowercase(),
    };
    adjective.to_string()
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: i32,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn taipei() -> RawApiPayload {
        json!({
            "cod": 200,
            "coord": {"lon": 121.5319, "lat": 25.0478},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds"}],
            "main": {"temp": 300.0, "humidity": 74},
            "wind": {"speed": 4.12, "deg": 90},
            "name": "Taipei"
        })
    }

    #[test]
    fn status_accepts_string_and_number_codes() {
        assert_eq!(ApiStatus::of(&json!({"cod": "404", "message": "city not found"})), ApiStatus::NotFound);
        assert_eq!(ApiStatus::of(&json!({"cod": 400})), ApiStatus::BadRequest);
        assert_eq!(ApiStatus::of(&json!({"cod": 200})), ApiStatus::Success);
        assert_eq!(ApiStatus::of(&taipei()), ApiStatus::Success);
    }

    #[test]
    fn normalize_extracts_snapshot() {
        let snapshot = WeatherSnapshot::normalize(&taipei()).unwrap();

        assert_eq!(snapshot.status, "Clouds");
        assert_eq!(snapshot.description, "Broken Clouds");
        assert!((snapshot.temperature_c - 26.85).abs() < 1e-9);
        assert_eq!(snapshot.humidity_pct, 74);
        assert_eq!(snapshot.wind_speed_mps, 4.12);
        assert_eq!(snapshot.wind_direction_deg, 90);
        assert_eq!(snapshot.adjective(), "cloudy");
    }

    #[test]
    fn normalize_fails_on_missing_fields() {
        let err = WeatherSnapshot::normalize(&json!({"cod": 200, "main": {"temp": 1.0}})).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedPayload(_)));

        let mut payload = taipei();
        payload["weather"] = json!([]);
        assert!(WeatherSnapshot::normalize(&payload).is_err());
    }

    #[test]
    fn normalize_reports_api_rejection() {
        let err = WeatherSnapshot::normalize(&json!({"cod": 401, "message": "Invalid API key"})).unwrap_err();
        assert!(matches!(err, WeatherError::ApiRejected { code: 401, ref message } if message == "Invalid API key"));
        assert!(err.user_message().contains("Invalid API key"));

        assert_eq!(status_code(&json!({"cod": "429"})), Some(429));
        assert_eq!(status_code(&json!({})), None);
    }

    #[test]
    fn coordinates_from_payload() {
        let coord = Coordinates::from_payload(&taipei()).unwrap();
        assert_eq!(coord.latitude, 25.0478);
        assert_eq!(coord.longitude, 121.5319);
    }

    #[test]
    fn unknown_keyword_falls_back_to_lowercase() {
        assert_eq!(weather_adjective("Tornado"), "being hit with a tornado");
        assert_eq!(weather_adjective("Meteor"), "meteor");
    }

    #[test]
    fn resolved_query_display_name() {
        let query = ResolvedQuery::unresolved(" new york ");
        assert!(!query.is_resolved());
        assert_eq!(query.display_name(), "New York");
    }
}
