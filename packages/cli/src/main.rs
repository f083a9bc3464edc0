#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for enriching the listing address dataset.
//!
//! Each subcommand reads a CSV, processes it row by row, and writes a CSV.
//! Running without a subcommand opens an interactive menu.

mod commands;
mod interactive;
mod progress;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use listing_enrich::Columns;
use listing_enrich::listing::EnrichOptions;
use listing_enrich_address::AddressMatcher;
use listing_enrich_scraper::search::SearchConfig;

#[derive(Parser)]
#[command(name = "listing_enrich", about = "Listing address dataset enrichment tools")]
struct Cli {
    /// Name of the full-address column
    #[arg(long, global = true)]
    address_column: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clear listing URLs and images that do not match the row's address
    Clean {
        /// Input CSV
        input: PathBuf,
        /// Output CSV (defaults to overwriting the input)
        output: Option<PathBuf>,
        /// Scheme and host accepted listing URLs must start with
        #[arg(long)]
        trusted_prefix: Option<String>,
    },
    /// Add a street-view static image URL per row (needs `GOOGLE_STREETVIEW_KEY`)
    StreetImages {
        /// Input CSV
        input: PathBuf,
        /// Output CSV
        output: PathBuf,
    },
    /// Search listing pages and hero images for rows without an image
    Enrich {
        /// Input CSV
        input: PathBuf,
        /// Output CSV
        output: PathBuf,
        /// Pause between searches in milliseconds
        #[arg(long, default_value = "1500")]
        pause_ms: u64,
        /// Number of search results to inspect per address
        #[arg(long, default_value = "15")]
        max_results: usize,
        /// Maximum number of rows to search (for testing)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Fill in missing latitude/longitude
    Geocode {
        /// Input CSV
        input: PathBuf,
        /// Output CSV
        output: PathBuf,
        /// Comma-separated geocoding service IDs: google, osm (default: all enabled)
        #[arg(long, value_delimiter = ',')]
        providers: Vec<String>,
    },
    /// Find the listing and hero image for a single address
    Hero {
        /// Free-text address
        #[arg(required = true)]
        address: Vec<String>,
        /// Download the hero image
        #[arg(long)]
        download: bool,
        /// Directory downloaded images are saved to
        #[arg(long, default_value = "images")]
        image_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();

    let mut columns = Columns::default();
    if let Some(name) = &cli.address_column {
        columns = columns.with_address(name);
    }

    let Some(command) = cli.command else {
        return interactive::run(&multi, &columns).await;
    };

    match command {
        Commands::Clean {
            input,
            output,
            trusted_prefix,
        } => {
            let matcher = match trusted_prefix {
                Some(prefix) => AddressMatcher::new(&prefix)
                    .ok_or_else(|| format!("Invalid trusted prefix: {prefix}"))?,
                None => AddressMatcher::default(),
            };
            commands::clean(&multi, &columns, matcher, &input, output.as_deref()).await?;
        }
        Commands::StreetImages { input, output } => {
            commands::street_images(&multi, &columns, &input, &output).await?;
        }
        Commands::Enrich {
            input,
            output,
            pause_ms,
            max_results,
            limit,
        } => {
            let options = EnrichOptions {
                search: SearchConfig::default().with_max_results(max_results),
                pause: Duration::from_millis(pause_ms),
                limit,
            };
            commands::enrich(&multi, &columns, &input, &output, options).await?;
        }
        Commands::Geocode {
            input,
            output,
            providers,
        } => {
            commands::geocode(&multi, &columns, &input, &output, &providers).await?;
        }
        Commands::Hero {
            address,
            download,
            image_dir,
        } => {
            let address = address.join(" ");
            let dir = download.then_some(image_dir.as_path());
            commands::hero(&address, dir).await?;
        }
    }

    Ok(())
}
