#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Row-by-row enrichment of the listing address dataset.
//!
//! Each driver reads a [`Dataset`], performs one operation per row, and
//! leaves the result in the dataset for the caller to write:
//!
//! - [`clean`] blanks listing URLs that do not match the row's address.
//! - [`street_view`] adds a street-view static image URL per row.
//! - [`listing`] searches for listing pages and their hero images.
//! - [`geocode`] fills in latitude/longitude.
//!
//! Rows are processed strictly in order, one request at a time.

pub mod clean;
pub mod geocode;
pub mod listing;
pub mod progress;
pub mod street_view;

use std::path::Path;

pub use listing_enrich_dataset::{Columns, Dataset, DatasetError};

/// `User-Agent` for API calls (geocoders require an identifying agent).
pub const API_USER_AGENT: &str = concat!("listing_enrich/", env!("CARGO_PKG_VERSION"));

/// Errors from the enrichment drivers.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Reading or writing the dataset failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// A scraping request failed.
    #[error(transparent)]
    Scrape(#[from] listing_enrich_scraper::ScrapeError),

    /// A geocoding request failed.
    #[error(transparent)]
    Geocode(#[from] listing_enrich_geocoder::GeocodeError),

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// A required environment variable is not set.
    #[error("{0} environment variable not set")]
    MissingEnv(&'static str),
}

/// Reads an environment variable, treating an empty value as unset.
///
/// # Errors
///
/// Returns [`EnrichError::MissingEnv`] if the variable is unset or empty.
pub fn require_env(name: &'static str) -> Result<String, EnrichError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(EnrichError::MissingEnv(name))
}

/// Builds the HTTP client used for geocoding APIs.
///
/// # Errors
///
/// Returns [`EnrichError::Client`] if the TLS backend cannot be initialised.
pub fn api_client() -> Result<reqwest::Client, EnrichError> {
    Ok(reqwest::Client::builder()
        .user_agent(API_USER_AGENT)
        .timeout(listing_enrich_scraper::DEFAULT_TIMEOUT)
        .build()?)
}

/// Reads `input`, applies `op`, and writes the result to `output`.
///
/// # Errors
///
/// Returns [`EnrichError`] if reading, the operation, or writing fails.
/// Nothing is written when the operation fails.
pub async fn rewrite_file<T, F, Fut>(input: &Path, output: &Path, op: F) -> Result<T, EnrichError>
where
    F: FnOnce(Dataset) -> Fut,
    Fut: Future<Output = Result<(Dataset, T), EnrichError>>,
{
    let dataset = Dataset::read_path(input)?;
    log::info!("Loaded {} rows from {}", dataset.len(), input.display());
    let (dataset, summary) = op(dataset).await?;
    dataset.write_path(output)?;
    log::info!("Saved enriched data to {}", output.display());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_env_var_is_reported_by_name() {
        let err = require_env("LISTING_ENRICH_TEST_UNSET_VAR").unwrap_err();
        assert_eq!(
            err.to_string(),
            "LISTING_ENRICH_TEST_UNSET_VAR environment variable not set"
        );
    }

    #[tokio::test]
    async fn rewrite_file_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("listing_enrich_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.csv");
        let output = dir.join("out.csv");
        std::fs::write(&input, "Full_Address\n\"1 Elm St, X\"\n").unwrap();

        let rows = rewrite_file(&input, &output, |mut dataset| async move {
            dataset.ensure_column("Extra");
            dataset.set(0, "Extra", "yes");
            let rows = dataset.len();
            Ok::<_, EnrichError>((dataset, rows))
        })
        .await
        .unwrap();

        assert_eq!(rows, 1);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "Full_Address,Extra\n\"1 Elm St, X\",yes\n"
        );
        std::fs::remove_dir_all(&dir).ok();
    }
}
