use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use skycast_core::{
    Config, LocationQuery, UnitSystem, WeatherQueryCoordinator, WeatherReport,
    locator_from_config,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Unit system for this lookup; defaults to the configured one.
    #[arg(short, long)]
    pub units: Option<UnitSystem>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and default unit system.
    Configure,

    /// Show weather for a city or a pair of coordinates.
    Show {
        /// City name, e.g. "Paris" or "Paris,FR".
        #[arg(required_unless_present_all = ["lat", "lon"], conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show weather for your approximate current position.
    Locate {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search, toggle units and locate from a prompt loop.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                city,
                lat,
                lon,
                output,
            } => {
                let location = match (city, lat, lon) {
                    (Some(city), _, _) => LocationQuery::city(&city)?,
                    (None, Some(lat), Some(lon)) => LocationQuery::coordinates(lat, lon)?,
                    _ => anyhow::bail!("Provide a city name or both --lat and --lon."),
                };

                let config = Config::load()?;
                let units = output.units.unwrap_or(config.units);
                let coordinator = WeatherQueryCoordinator::from_config(&config)?;

                let report = coordinator.query(&location, units).await?;
                print_report(&report, output.json)
            }
            Command::Locate { output } => {
                let config = Config::load()?;
                let units = output.units.unwrap_or(config.units);
                let coordinator = WeatherQueryCoordinator::from_config(&config)?;
                let locator = locator_from_config(
                    &config.geolocation,
                    Duration::from_secs(config.provider.timeout_secs),
                );

                let report = coordinator.locate_and_query(locator.as_ref(), units).await?;
                print_report(&report, output.json)
            }
            Command::Interactive => {
                let config = Config::load()?;
                interactive::run(&config).await
            }
        }
    }
}

fn print_report(report: &WeatherReport, json: bool) -> anyhow::Result<()> {
    if json {
        let out =
            serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;
        println!("{out}");
    } else {
        print!("{}", render::report(report));
    }
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    let starting = UnitSystem::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or(0);
    let units = Select::new("Default unit system:", UnitSystem::all().to_vec())
        .with_starting_cursor(starting)
        .prompt()
        .context("Failed to read unit system")?;

    config.set_api_key(api_key);
    config.units = units;
    config.require_api_key()?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
