use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use skycast_core::location::geoip::GeoIpProvider;
use skycast_core::{
    Config, Coordinates, FixedProvider, ForecastClient, GeocodeClient, LocationProvider, pipeline,
};

use crate::{html, screen};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather display CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the weather for the current location and show it.
    Show {
        /// Manual latitude override.
        #[arg(long, requires = "longitude")]
        latitude: Option<f64>,

        /// Manual longitude override.
        #[arg(long, requires = "latitude")]
        longitude: Option<f64>,

        /// Also write the rendered view as a static HTML page.
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
    },

    /// Set or clear the stored location override.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show {
                latitude,
                longitude,
                html,
            } => show(latitude, longitude, html).await,
            Command::Configure => configure(),
        }
    }
}

async fn show(
    latitude: Option<f64>,
    longitude: Option<f64>,
    html_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = Config::load()?;

    // Flags beat the stored override; both beat network positioning.
    let (provider, city_label): (Box<dyn LocationProvider>, Option<String>) =
        match (latitude, longitude, &config.location) {
            (Some(latitude), Some(longitude), _) => (
                Box::new(FixedProvider::new(Coordinates {
                    latitude,
                    longitude,
                })),
                None,
            ),
            (_, _, Some(stored)) => (
                Box::new(FixedProvider::new(stored.coordinates())),
                stored.label.clone(),
            ),
            _ => (Box::new(GeoIpProvider::new()?), None),
        };

    let forecast = ForecastClient::new();
    let geocode = GeocodeClient::new()?;
    let now = Local::now().naive_local();

    let updates = pipeline::run(
        provider.as_ref(),
        &forecast,
        &geocode,
        city_label.as_deref(),
        now,
    )
    .await?;

    print!("{}", screen::draw(&updates));

    if let Some(path) = html_path {
        html::write_page(&updates, &path)
            .with_context(|| format!("Failed to write HTML page: {}", path.display()))?;
        println!("Saved HTML view to {}", path.display());
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if let Some(stored) = &config.location {
        println!(
            "Current override: {:.4}, {:.4} ({})",
            stored.latitude,
            stored.longitude,
            stored.label.as_deref().unwrap_or("unlabeled")
        );
    }

    let store = inquire::Confirm::new("Store a manual location override?")
        .with_default(config.has_location())
        .with_help_message("Answering 'no' clears any stored override and uses network positioning")
        .prompt()?;

    if !store {
        config.clear_location();
        config.save()?;
        println!("Location override cleared.");
        return Ok(());
    }

    let latitude = inquire::CustomType::<f64>::new("Latitude:")
        .with_error_message("Enter a number like 47.3769")
        .prompt()?;
    let longitude = inquire::CustomType::<f64>::new("Longitude:")
        .with_error_message("Enter a number like 8.5417")
        .prompt()?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        bail!("Coordinates out of range: latitude must be within ±90, longitude within ±180.");
    }

    let label = inquire::Text::new("Label (optional, shown instead of the geocoded city):")
        .prompt()?;
    let label = {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };

    config.set_location(latitude, longitude, label);
    config.save()?;

    println!("Saved. `skycast show` will use the stored location.");
    Ok(())
}
