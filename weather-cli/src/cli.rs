use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text};
use std::path::PathBuf;

use weather_lookup_core::{
    CityCatalog, ComparisonFeature, Config, TemperatureUnit, WeatherError, WeatherProvider,
    WeatherService, provider_from_config,
};

use crate::{output, prompt::TerminalPrompt};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather, forecasts and city comparisons")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and other preferences.
    Configure,

    /// Show weather, temperature, humidity and wind for a city.
    Show {
        /// Name of the city to check.
        city: String,

        /// Temperature unit: c or f. Defaults to the configured unit.
        #[arg(long)]
        unit: Option<TemperatureUnit>,
    },

    /// Show a day-by-day temperature and weather forecast for a city.
    Forecast {
        /// Name of the city to forecast.
        city: String,

        /// Temperature unit: c or f. Defaults to the configured unit.
        #[arg(long)]
        unit: Option<TemperatureUnit>,
    },

    /// Compare the weather and temperature of two cities.
    Compare {
        /// First city to compare.
        first: String,

        /// Second city to compare.
        second: String,

        /// Temperature unit: c or f. Defaults to the configured unit.
        #[arg(long)]
        unit: Option<TemperatureUnit>,

        /// What to compare: a (all), w (weather) or t (temperature).
        #[arg(long, default_value_t = ComparisonFeature::All)]
        feature: ComparisonFeature,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let rendered = match self.command {
            Command::Configure => return configure(),
            Command::Show { city, unit } => {
                let session = Session::open()?;
                let report = session
                    .service()
                    .check_weather(&city, session.unit(unit), &mut TerminalPrompt)
                    .await
                    .map_err(abort)?;
                output::render_current(&report)
            }
            Command::Forecast { city, unit } => {
                let session = Session::open()?;
                let today = chrono::Local::now().date_naive();
                let report = session
                    .service()
                    .check_forecast(&city, session.unit(unit), today, &mut TerminalPrompt)
                    .await
                    .map_err(abort)?;
                output::render_forecast(&report)
            }
            Command::Compare { first, second, unit, feature } => {
                let session = Session::open()?;
                let report = session
                    .service()
                    .check_comparison(&first, &second, session.unit(unit), feature, &mut TerminalPrompt)
                    .await
                    .map_err(abort)?;
                output::render_comparison(&report)
            }
        };

        println!();
        println!("{rendered}");
        println!("{}", output::RULE);
        Ok(())
    }
}

/// Everything a lookup command needs, loaded once at startup.
struct Session {
    config: Config,
    provider: Box<dyn WeatherProvider>,
    catalog: CityCatalog,
}

impl Session {
    fn open() -> anyhow::Result<Self> {
        let config = Config::load()?;
        let provider = provider_from_config(&config)?;
        let catalog = CityCatalog::load(&config.cities_file).map_err(abort)?;
        Ok(Self { config, provider, catalog })
    }

    fn service(&self) -> WeatherService<'_> {
        WeatherService::new(self.provider.as_ref(), &self.catalog, self.config.forecast_days)
    }

    fn unit(&self, requested: Option<TemperatureUnit>) -> TemperatureUnit {
        requested.unwrap_or(self.config.default_unit)
    }
}

/// Turn a lookup failure into the message shown to the user.
fn abort(err: WeatherError) -> anyhow::Error {
    tracing::debug!(error = ?err, "command aborted");
    anyhow::anyhow!(err.user_message())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let current = config.cities_file.display().to_string();
    let cities_file = Text::new("Path to the city list:")
        .with_default(&current)
        .prompt()
        .context("Failed to read city list path")?;
    config.cities_file = PathBuf::from(cities_file.trim());

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let cursor = units.iter().position(|u| *u == config.default_unit).unwrap_or(0);
    config.default_unit = Select::new("Default temperature unit:", units)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read default unit")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
