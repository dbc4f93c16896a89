//! Plain-text rendering of lookup results.

use weather_lookup_core::{
    ComparisonReport, CurrentReport, ForecastReport, WeatherError, model::weather_adjective,
    units::kelvin_to_celsius, wind,
};

pub const RULE: &str = "────────────────────────────────────────";

pub fn render_current(report: &CurrentReport) -> String {
    let snapshot = &report.snapshot;
    let unit = report.unit;

    [
        format!(
            "{} is {} today. ({})",
            report.city,
            snapshot.adjective(),
            snapshot.description
        ),
        format!("Temperature: {:.2}{}", unit.from_celsius(snapshot.temperature_c), unit.symbol()),
        format!("Humidity: {}%", snapshot.humidity_pct),
        format!(
            "Wind speed: {}m/s (Direction: {})",
            snapshot.wind_speed_mps,
            wind::classify(snapshot.wind_direction_deg)
        ),
    ]
    .join("\n")
}

pub fn render_forecast(report: &ForecastReport) -> String {
    let unit = report.unit;
    let mut lines = vec![format!("{} forecast", report.city), String::new()];

    for day in &report.days {
        match day {
            Ok(outlook) => {
                lines.push(format!("[{}]", outlook.date));
                if outlook.is_tornado() {
                    lines.push("The city is likely to be hit by a tornado! Please stay safe!".into());
                } else {
                    lines.push(format!(
                        "The weather on this day is mostly {}.",
                        weather_adjective(&outlook.dominant_weather)
                    ));
                }
                let average = unit.from_celsius(kelvin_to_celsius(outlook.average_temperature));
                lines.push(format!("The average temperature will be {average:.2}{}.", unit.symbol()));
            }
            Err(WeatherError::NoForecastData(date)) => {
                lines.push(format!("[{date}]"));
                lines.push("Insufficient data for this day.".into());
            }
            Err(err) => lines.push(err.user_message()),
        }
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}

pub fn render_comparison(report: &ComparisonReport) -> String {
    let mut lines = Vec::new();

    if report.feature.includes_weather() {
        lines.push(compare_weather(report));
    }
    if report.feature.includes_temperature() {
        lines.push(compare_temperature(report));
    }

    lines.join("\n")
}

fn compare_weather(report: &ComparisonReport) -> String {
    let (first, second) = (&report.first, &report.second);
    let first_weather = first.snapshot.adjective();
    let second_weather = second.snapshot.adjective();

    if first_weather == second_weather {
        format!("Both {} and {} are {first_weather}.", first.city, second.city)
    } else {
        format!("{} is {first_weather}, while {} is {second_weather}.", first.city, second.city)
    }
}

fn compare_temperature(report: &ComparisonReport) -> String {
    let unit = report.unit;
    let symbol = unit.symbol();
    let (first, second) = (&report.first, &report.second);
    let first_temp = unit.from_celsius(first.snapshot.temperature_c);
    let second_temp = unit.from_celsius(second.snapshot.temperature_c);
    let difference = unit.scale_difference(report.temperature_difference_c());

    let relation = if difference < 0.0 {
        "colder"
    } else if difference > 0.0 {
        "warmer"
    } else {
        return format!(
            "{} has the same temperature as {} ({second_temp:.2}{symbol}).",
            first.city, second.city
        );
    };

    format!(
        "{}({first_temp:.2}{symbol}) is {:.2} {symbol} {relation} than {}({second_temp:.2}{symbol}).",
        first.city,
        difference.abs(),
        second.city
    )
}
