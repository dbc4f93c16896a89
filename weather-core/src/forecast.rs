//! Day-bucketing of the 3-hourly forecast timeseries.

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::{error::WeatherError, model::RawApiPayload};

/// Length of the `YYYY-MM-DD` prefix of a forecast timestamp.
const DATE_PREFIX_LEN: usize = 10;

pub const DEFAULT_FORECAST_DAYS: usize = 5;

/// One usable sample from the forecast timeseries.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    /// `dt_txt`, e.g. `2024-05-01 12:00:00`.
    pub timestamp: String,
    pub weather: String,
    /// Kelvin, as delivered by the API.
    pub temperature: f64,
}

impl ForecastEntry {
    pub fn date(&self) -> &str {
        self.timestamp.get(..DATE_PREFIX_LEN).unwrap_or(&self.timestamp)
    }
}

/// Samples that fell on a single calendar day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastDayBucket {
    pub temperatures: Vec<f64>,
    /// Keyword counts in first-seen order.
    pub weather_counts: Vec<(String, usize)>,
}

impl ForecastDayBucket {
    fn record(&mut self, weather: &str, temperature: f64) {
        self.temperatures.push(temperature);
        match self.weather_counts.iter_mut().find(|(kw, _)| kw == weather) {
            Some((_, count)) => *count += 1,
            None => self.weather_counts.push((weather.to_string(), 1)),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    /// Most frequent keyword; ties go to the one seen first.
    pub fn dominant_weather(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.weather_counts {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(kw, _)| kw.as_str())
    }

    pub fn average_temperature(&self) -> Option<f64> {
        if self.temperatures.is_empty() {
            return None;
        }
        Some(self.temperatures.iter().sum::<f64>() / self.temperatures.len() as f64)
    }
}

/// Finalized view of one forecast day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayOutlook {
    pub date: String,
    pub dominant_weather: String,
    /// Kelvin.
    pub average_temperature: f64,
}

impl DayOutlook {
    pub fn from_bucket(date: &str, bucket: &ForecastDayBucket) -> Result<Self, WeatherError> {
        let no_data = || WeatherError::NoForecastData(date.to_string());
        let dominant_weather = bucket.dominant_weather().ok_or_else(no_data)?.to_string();
        let average_temperature = bucket.average_temperature().ok_or_else(no_data)?;

        Ok(Self { date: date.to_string(), dominant_weather, average_temperature })
    }

    pub fn is_tornado(&self) -> bool {
        self.dominant_weather == "Tornado"
    }
}

/// `days` consecutive `YYYY-MM-DD` strings starting at `today`.
pub fn forecast_days(today: NaiveDate, days: usize) -> Vec<String> {
    (0..days as u64)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .map(|day| day.format("%Y-%m-%d").to_string())
        .collect()
}

/// Assign each entry to the first day whose date prefix it matches.
///
/// Entries outside every day are dropped. Returns one bucket per day, in order.
pub fn bucket_forecast(entries: &[ForecastEntry], days: &[String]) -> Vec<ForecastDayBucket> {
    let mut buckets = vec![ForecastDayBucket::default(); days.len()];

    for entry in entries {
        if let Some(index) = days.iter().position(|day| day == entry.date()) {
            buckets[index].record(&entry.weather, entry.temperature);
        }
    }

    let used: usize = buckets.iter().map(ForecastDayBucket::entry_count).sum();
    tracing::debug!(total = entries.len(), used, "bucketed forecast entries");
    buckets
}

/// Flatten a forecast payload into timeseries entries.
pub fn parse_forecast(payload: &RawApiPayload) -> Result<Vec<ForecastEntry>, WeatherError> {
    let parsed = OwForecastResponse::deserialize(payload)?;

    parsed
        .list
        .into_iter()
        .map(|item| {
            let weather = item.weather.into_iter().next().ok_or_else(|| {
                <serde_json::Error as serde::de::Error>::custom(format!(
                    "forecast entry {} has no weather",
                    item.dt_txt
                ))
            })?;
            Ok(ForecastEntry {
                timestamp: item.dt_txt,
                weather: weather.main,
                temperature: item.main.temp,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastItem {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(timestamp: &str, weather: &str, temperature: f64) -> ForecastEntry {
        ForecastEntry { timestamp: timestamp.into(), weather: weather.into(), temperature }
    }

    fn may_days() -> Vec<String> {
        forecast_days(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), DEFAULT_FORECAST_DAYS)
    }

    #[test]
    fn day_boundaries_cross_month_end() {
        let days = forecast_days(NaiveDate::from_ymd_opt(2024, 2, 27).unwrap(), 5);
        assert_eq!(days, ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01", "2024-03-02"]);
    }

    #[test]
    fn five_entries_one_per_day() {
        let days = may_days();
        let entries: Vec<_> = days
            .iter()
            .enumerate()
            .map(|(i, day)| entry(&format!("{day} 12:00:00"), "Clear", 280.0 + i as f64))
            .collect();

        let buckets = bucket_forecast(&entries, &days);

        assert_eq!(buckets.len(), days.len());
        assert_eq!(buckets.iter().map(ForecastDayBucket::entry_count).sum::<usize>(), 5);
        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.average_temperature(), Some(280.0 + i as f64));
        }
    }

    #[test]
    fn averages_and_dominant_weather() {
        let days = may_days();
        let entries = vec![
            entry("2024-05-01 09:00:00", "Rain", 280.0),
            entry("2024-05-01 12:00:00", "Clouds", 284.0),
            entry("2024-05-01 15:00:00", "Clouds", 286.0),
            entry("2024-05-02 00:00:00", "Snow", 270.0),
            entry("2024-05-02 03:00:00", "Clear", 272.0),
            entry("2024-05-09 00:00:00", "Rain", 999.0),
        ];

        let buckets = bucket_forecast(&entries, &days);

        assert_eq!(buckets[0].average_temperature(), Some(850.0 / 3.0));
        assert_eq!(buckets[0].dominant_weather(), Some("Clouds"));
        // tie: first seen wins
        assert_eq!(buckets[1].dominant_weather(), Some("Snow"));
        assert_eq!(buckets[1].average_temperature(), Some(271.0));
        // out-of-window entry dropped
        assert_eq!(buckets.iter().map(ForecastDayBucket::entry_count).sum::<usize>(), 5);
    }

    #[test]
    fn empty_day_reports_no_data() {
        let days = may_days();
        let buckets = bucket_forecast(&[], &days);

        assert!(buckets[4].is_empty());
        assert_eq!(buckets[4].average_temperature(), None);
        let err = DayOutlook::from_bucket(&days[4], &buckets[4]).unwrap_err();
        assert!(matches!(err, WeatherError::NoForecastData(day) if day == "2024-05-05"));
    }

    #[test]
    fn parse_forecast_payload() {
        let payload = json!({
            "cod": "200",
            "list": [
                {"dt_txt": "2024-05-01 12:00:00", "main": {"temp": 290.5}, "weather": [{"main": "Tornado"}]},
                {"dt_txt": "2024-05-01 15:00:00", "main": {"temp": 291.5}, "weather": [{"main": "Tornado"}]}
            ]
        });

        let entries = parse_forecast(&payload).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date(), "2024-05-01");

        let buckets = bucket_forecast(&entries, &may_days());
        let outlook = DayOutlook::from_bucket("2024-05-01", &buckets[0]).unwrap();
        assert!(outlook.is_tornado());
        assert_eq!(outlook.average_temperature, 291.0);
    }

    #[test]
    fn parse_forecast_rejects_missing_list() {
        assert!(parse_forecast(&json!({"cod": "200"})).is_err());
    }
}
