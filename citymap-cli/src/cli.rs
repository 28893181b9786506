use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Utc;
use citymap_core::{CityError, CityMap, Config, Units, geo, provider_from_config};
use clap::{Parser, Subcommand};
use inquire::{Password, Select};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citymap", version, about = "Track, filter and locate cities")]
pub struct Cli {
    /// SQLite database to use instead of the configured one.
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(flatten)]
    Catalog(CatalogCommand),

    /// Current weather in a city.
    Weather { city: String },

    /// Configure the weather API key and units interactively.
    Configure,
}

/// Commands that read or write the city database.
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Create the user/city link table if it is missing.
    Init,

    /// Add a catalog city to a user's selection.
    Add { user_id: i64, city: String },

    /// List a user's selected cities.
    List { user_id: i64 },

    /// Show country and coordinates of a city.
    Coords { city: String },

    /// List cities of a country, optionally within a density range.
    Country {
        country: String,

        #[arg(long, requires = "max")]
        min: Option<f64>,

        #[arg(long, requires = "min")]
        max: Option<f64>,
    },

    /// List cities whose population density lies in [min, max].
    Density {
        #[arg(allow_negative_numbers = true)]
        min: f64,
        #[arg(allow_negative_numbers = true)]
        max: f64,
    },

    /// Great-circle distance between two cities.
    Distance { from: String, to: String },

    /// Map points (name and coordinates) for a user's selection.
    Points { user_id: i64 },

    /// Current local time in a city.
    Time { city: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Weather { city } => show_weather(&config, &city).await,
            Command::Catalog(command) => {
                let path = match self.database {
                    Some(path) => path,
                    None => config.database_path()?,
                };
                tracing::debug!(database = %path.display(), "opening city database");

                let map = CityMap::open(&path)
                    .await
                    .with_context(|| format!("Failed to open city database: {}", path.display()))?;

                run_catalog(&map, command).await
            }
        }
    }
}

async fn run_catalog(map: &CityMap, command: CatalogCommand) -> anyhow::Result<()> {
    match command {
        CatalogCommand::Init => println!("Link table ready"),
        CatalogCommand::Add { user_id, city } => {
            if !map.store().add_city(user_id, &city).await? {
                bail!("City '{city}' is not in the catalog");
            }
            println!("Added {city} for user {user_id}");
        }
        CatalogCommand::List { user_id } => print_names(&map.store().list_cities(user_id).await?),
        CatalogCommand::Coords { city } => match map.query().city(&city).await? {
            Some(found) => println!("{} ({}): {}", found.name, found.country, found.coordinates()),
            None => bail!("City '{city}' is not in the catalog"),
        },
        CatalogCommand::Country { country, min, max } => {
            let names = match (min, max) {
                (Some(min), Some(max)) => {
                    map.query().cities_in_country_by_density(&country, min, max).await
                }
                _ => map.query().cities_in_country(&country).await,
            };
            print_names(&names.map_err(explain)?);
        }
        CatalogCommand::Density { min, max } => {
            print_names(&map.query().cities_by_density(min, max).await.map_err(explain)?);
        }
        CatalogCommand::Distance { from, to } => match map.distance_km(&from, &to).await? {
            Some(km) => println!("{from} -> {to}: {km:.1} km"),
            None => bail!("Both '{from}' and '{to}' must be in the catalog"),
        },
        CatalogCommand::Points { user_id } => {
            for point in map.map_points(user_id).await? {
                println!("{}\t{}", point.name, point.coordinates);
            }
        }
        CatalogCommand::Time { city } => match map.local_time(&city, Utc::now()).await? {
            Some(time) => {
                println!("{city}: {} ({})", time.format(geo::TIME_FORMAT), time.timezone())
            }
            None => bail!("City '{city}' is not in the catalog"),
        },
    }

    Ok(())
}

async fn show_weather(config: &Config, city: &str) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    match provider.current_weather(city).await? {
        Some(weather) => println!("{city}: {}", weather.summary()),
        None => println!("{city}: no data"),
    }
    Ok(())
}

fn print_names(names: &[String]) {
    if names.is_empty() {
        println!("(no cities)");
    }
    for name in names {
        println!("{name}");
    }
}

fn explain(err: CityError) -> anyhow::Error {
    match err {
        CityError::InvalidRange { .. } => {
            anyhow::anyhow!("{err}\nHint: pass the smaller density first.")
        }
        other => other.into(),
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_weather_api_key(api_key);

    let units = Select::new("Units:", vec!["metric", "imperial"])
        .prompt()
        .context("Failed to read units")?;
    config.units = match units {
        "imperial" => Units::Imperial,
        _ => Units::Metric,
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
