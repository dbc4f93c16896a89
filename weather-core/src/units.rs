use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const KELVIN_OFFSET: f64 = 273.15;

pub fn kelvin_to_celsius(temperature: f64) -> f64 {
    temperature - KELVIN_OFFSET
}

pub fn celsius_to_fahrenheit(temperature: f64) -> f64 {
    temperature * 9.0 / 5.0 + 32.0
}

/// Temperature unit preference for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "c")]
    Celsius,
    #[serde(rename = "f")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "c",
            TemperatureUnit::Fahrenheit => "f",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    /// Convert an absolute Celsius reading into this unit.
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }

    /// Convert a Celsius temperature *difference* into this unit (no offset).
    pub fn scale_difference(&self, delta_celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => delta_celsius,
            TemperatureUnit::Fahrenheit => delta_celsius * 9.0 / 5.0,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(format!("Unknown unit '{value}'. Supported units: c, f.")),
        }
    }
}
