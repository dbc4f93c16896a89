//! Error types shared by the lookup pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Which side of a two-city comparison a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSide {
    First,
    Second,
}

impl ComparisonSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonSide::First => "first",
            ComparisonSide::Second => "second",
        }
    }
}

/// Why a line typed during disambiguation was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("{choice} is outside the range 1..={max}")]
    OutOfRange { choice: String, max: usize },
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Connection to the weather API timed out")]
    ConnectTimeout,

    #[error("Request to the weather API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed weather API payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Weather API answered {code}: {message}")]
    ApiRejected { code: u16, message: String },

    #[error("Invalid city name: {city}")]
    InvalidCity {
        city: String,
        side: Option<ComparisonSide>,
    },

    #[error("Invalid choice: {0}")]
    InvalidChoice(#[from] ChoiceError),

    #[error("No forecast data for {0}")]
    NoForecastData(String),

    #[error("Failed to load city list from {}: {source}", .path.display())]
    CatalogLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl WeatherError {
    /// User-friendly error message for terminal display.
    pub fn user_message(&self) -> String {
        match self {
            Self::ConnectTimeout => "Unable to connect. Please try again later.".to_string(),
            Self::Transport(_) => "Unable to reach the weather service.".to_string(),
            Self::MalformedPayload(_) => {
                "The weather service returned an unexpected response.".to_string()
            }
            Self::ApiRejected { message, .. } if !message.is_empty() => {
                format!("The weather service rejected the request: {message}")
            }
            Self::ApiRejected { code, .. } => {
                format!("The weather service rejected the request (code {code}).")
            }
            Self::InvalidCity { side: Some(side), .. } => {
                format!("The {} city name is invalid.", side.as_str())
            }
            Self::InvalidCity { city, side: None } => format!("'{city}' is not a known city."),
            Self::InvalidChoice(ChoiceError::NotANumber(_)) => {
                "Please input numbers only.".to_string()
            }
            Self::InvalidChoice(ChoiceError::OutOfRange { .. }) => {
                "Please select from the given numbers only.".to_string()
            }
            Self::NoForecastData(day) => format!("Insufficient data for {day}."),
            Self::CatalogLoad { path, .. } => {
                format!("Could not read the city list at {}.", path.display())
            }
            Self::Prompt(msg) => format!("Input aborted: {msg}"),
        }
    }

    /// Whether this error aborts the whole command rather than a single lookup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConnectTimeout
                | Self::Transport(_)
                | Self::ApiRejected { .. }
                | Self::CatalogLoad { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_city_message_names_comparison_side() {
        let err = WeatherError::InvalidCity { city: "Nowhere".into(), side: Some(ComparisonSide::Second) };
        assert_eq!(err.user_message(), "The second city name is invalid.");

        let err = WeatherError::InvalidCity { city: "Nowhere".into(), side: None };
        assert!(err.user_message().contains("Nowhere"));
    }

    #[test]
    fn choice_errors_map_to_reprompt_messages() {
        let err = WeatherError::from(ChoiceError::NotANumber("three".into()));
        assert!(err.user_message().contains("numbers only"));

        let err = WeatherError::from(ChoiceError::OutOfRange { choice: "5".into(), max: 4 });
        assert!(err.user_message().contains("given numbers"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn catalog_failure_is_fatal() {
        let err = WeatherError::CatalogLoad {
            path: PathBuf::from("cities.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_fatal());
        assert!(err.user_message().contains("cities.txt"));
    }
}
