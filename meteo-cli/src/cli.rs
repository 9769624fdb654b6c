use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use meteo_core::{
    Config, ForecastClient, GeoLocation, GeocodingClient, WeatherSnapshot, describe_weather_code,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather lookup via Open-Meteo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List geocoding candidates for a place name.
    Search {
        /// Free-text place name, e.g. "Berlin".
        query: String,

        /// Maximum number of candidates to request.
        #[arg(long)]
        count: Option<u8>,
    },

    /// Show current weather and the daily outlook for a place.
    Show {
        /// Place name; when several candidates match, one is picked interactively.
        place: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Search { query, count } => {
                if let Some(count) = count {
                    config.result_count = count;
                }
                search(&config, &query).await
            }
            Command::Show { place } => show(&config, &place).await,
        }
    }
}

async fn search(config: &Config, query: &str) -> anyhow::Result<()> {
    let client = GeocodingClient::from_config(config);
    let locations = client
        .search(query)
        .await
        .with_context(|| format!("Location search for {query:?} failed"))?;

    if locations.is_empty() {
        println!("No matches for {query:?}.");
        return Ok(());
    }

    for location in &locations {
        println!(
            "{location}  ({:.4}, {:.4})",
            location.latitude, location.longitude
        );
    }

    Ok(())
}

async fn show(config: &Config, place: &str) -> anyhow::Result<()> {
    let geocoding = GeocodingClient::from_config(config);
    let mut locations = geocoding
        .search(place)
        .await
        .with_context(|| format!("Location search for {place:?} failed"))?;

    if locations.is_empty() {
        bail!("No matches for {place:?}.");
    }

    let location = if locations.len() == 1 {
        locations.remove(0)
    } else {
        inquire::Select::new("Which location?", locations)
            .prompt()
            .context("No location selected")?
    };

    let forecast = ForecastClient::from_config(config);
    let snapshot = forecast
        .fetch(location.latitude, location.longitude)
        .await
        .with_context(|| format!("Weather fetch for {location} failed"))?;

    print_snapshot(&location, &snapshot);
    Ok(())
}

fn print_snapshot(location: &GeoLocation, snapshot: &WeatherSnapshot) {
    let current = &snapshot.current;
    let period = if current.is_daytime() { "day" } else { "night" };

    println!("{location} ({})", snapshot.timezone);
    println!(
        "Now: {}°C, {} [{period}]",
        current.temperature,
        describe_weather_code(current.weather_code),
    );
    println!(
        "Humidity {}%, wind {} km/h",
        current.humidity, current.wind_speed
    );
    println!();

    let daily = &snapshot.daily;
    let rows = daily
        .time
        .iter()
        .zip(&daily.weather_code)
        .zip(&daily.temp_max)
        .zip(&daily.temp_min);

    for (((date, code), max), min) in rows {
        println!(
            "{}  {:>5.1}° / {:>5.1}°  {}",
            date.format("%a %d %b"),
            max,
            min,
            describe_weather_code(*code),
        );
    }
}
