//! Command entry points: current weather, forecast and two-city comparison.

use chrono::NaiveDate;
use std::{fmt, str::FromStr};

use crate::{
    catalog::CityCatalog,
    error::{ComparisonSide, WeatherError},
    forecast::{DayOutlook, bucket_forecast, forecast_days, parse_forecast},
    model::{Coordinates, RawApiPayload, ResolvedQuery, WeatherSnapshot},
    provider::WeatherProvider,
    resolve::{InputPolicy, Resolver, UserInteraction},
    units::TemperatureUnit,
};

/// Which aspect of two cities to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComparisonFeature {
    #[default]
    All,
    Weather,
    Temperature,
}

impl ComparisonFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonFeature::All => "a",
            ComparisonFeature::Weather => "w",
            ComparisonFeature::Temperature => "t",
        }
    }

    pub fn includes_weather(&self) -> bool {
        matches!(self, ComparisonFeature::All | ComparisonFeature::Weather)
    }

    pub fn includes_temperature(&self) -> bool {
        matches!(self, ComparisonFeature::All | ComparisonFeature::Temperature)
    }
}

impl fmt::Display for ComparisonFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonFeature {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "a" | "all" => Ok(ComparisonFeature::All),
            "w" | "weather" => Ok(ComparisonFeature::Weather),
            "t" | "temperature" => Ok(ComparisonFeature::Temperature),
            _ => Err(format!("Unknown comparison feature '{value}'. Supported: a, w, t.")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CurrentReport {
    pub city: String,
    pub snapshot: WeatherSnapshot,
    pub unit: TemperatureUnit,
}

#[derive(Debug)]
pub struct ForecastReport {
    pub city: String,
    /// One entry per forecast day; days without samples carry [`WeatherError::NoForecastData`].
    pub days: Vec<Result<DayOutlook, WeatherError>>,
    pub unit: TemperatureUnit,
}

#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub first: CurrentReport,
    pub second: CurrentReport,
    pub feature: ComparisonFeature,
    pub unit: TemperatureUnit,
}

impl ComparisonReport {
    /// First city minus second city, in °C.
    pub fn temperature_difference_c(&self) -> f64 {
        self.first.snapshot.temperature_c - self.second.snapshot.temperature_c
    }
}

pub struct WeatherService<'a> {
    provider: &'a dyn WeatherProvider,
    resolver: Resolver<'a>,
    forecast_days: usize,
}

impl<'a> WeatherService<'a> {
    pub fn new(
        provider: &'a dyn WeatherProvider,
        catalog: &'a CityCatalog,
        forecast_days: usize,
    ) -> Self {
        Self { provider, resolver: Resolver::new(provider, catalog), forecast_days }
    }

    pub fn with_input_policy(mut self, policy: InputPolicy) -> Self {
        self.resolver = self.resolver.with_policy(policy);
        self
    }

    pub async fn check_weather(
        &self,
        city: &str,
        unit: TemperatureUnit,
        ui: &mut dyn UserInteraction,
    ) -> Result<CurrentReport, WeatherError> {
        let resolved = self.resolver.resolve(city, false, ui).await?;
        let (payload, city) = require(resolved, None)?;
        current_report(&payload, city, unit)
    }

    pub async fn check_forecast(
        &self,
        city: &str,
        unit: TemperatureUnit,
        today: NaiveDate,
        ui: &mut dyn UserInteraction,
    ) -> Result<ForecastReport, WeatherError> {
        let resolved = self.resolver.resolve(city, false, ui).await?;
        let (payload, city) = require(resolved, None)?;

        let coord = Coordinates::from_payload(&payload)?;
        let forecast = self.provider.forecast(coord.latitude, coord.longitude).await?;
        let entries = parse_forecast(&forecast)?;

        let days = forecast_days(today, self.forecast_days);
        let buckets = bucket_forecast(&entries, &days);
        let days = days
            .iter()
            .zip(&buckets)
            .map(|(day, bucket)| DayOutlook::from_bucket(day, bucket))
            .collect();

        Ok(ForecastReport { city, days, unit })
    }

    /// Resolve both cities in order; the first failure aborts the comparison.
    pub async fn check_comparison(
        &self,
        first: &str,
        second: &str,
        unit: TemperatureUnit,
        feature: ComparisonFeature,
        ui: &mut dyn UserInteraction,
    ) -> Result<ComparisonReport, WeatherError> {
        let resolved = self.resolver.resolve(first, true, ui).await?;
        let (payload, city) = require(resolved, Some(ComparisonSide::First))?;
        let first = current_report(&payload, city, unit)?;

        let resolved = self.resolver.resolve(second, true, ui).await?;
        let (payload, city) = require(resolved, Some(ComparisonSide::Second))?;
        let second = current_report(&payload, city, unit)?;

        Ok(ComparisonReport { first, second, feature, unit })
    }
}

fn require(
    resolved: ResolvedQuery,
    side: Option<ComparisonSide>,
) -> Result<(RawApiPayload, String), WeatherError> {
    let city = resolved.display_name();
    match resolved.payload {
        Some(payload) => Ok((payload, city)),
        None => Err(WeatherError::InvalidCity { city: resolved.city, side }),
    }
}

fn current_report(
    payload: &RawApiPayload,
    city: String,
    unit: TemperatureUnit,
) -> Result<CurrentReport, WeatherError> {
    Ok(CurrentReport { city, snapshot: WeatherSnapshot::normalize(payload)?, unit })
}
