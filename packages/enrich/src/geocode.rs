//! Latitude/longitude enrichment.

use std::sync::Arc;

use listing_enrich_geocoder::{GeocoderConfig, geocode_address};

use crate::progress::ProgressCallback;
use crate::{Columns, Dataset, EnrichError};

/// Outcome counts of a geocoding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeocodeSummary {
    /// Rows that received coordinates.
    pub geocoded: usize,
    /// Rows that already had both coordinates or had no address.
    pub skipped: usize,
    /// Rows no provider could match.
    pub unmatched: usize,
    /// Rows where every provider errored.
    pub failed: usize,
}

/// Formats a coordinate with six decimal places (~0.1 m).
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

/// Geocodes every row missing a latitude or longitude.
///
/// The coordinate columns are appended if missing. Rows are geocoded one
/// at a time with the config's pause after each lookup.
///
/// # Errors
///
/// Returns [`EnrichError::Dataset`] if the address column is missing.
pub async fn geocode_dataset(
    client: &reqwest::Client,
    config: &GeocoderConfig,
    dataset: &mut Dataset,
    columns: &Columns,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<GeocodeSummary, EnrichError> {
    dataset.require_column(&columns.address)?;
    dataset.ensure_column(&columns.latitude);
    dataset.ensure_column(&columns.longitude);

    progress.set_total(dataset.len() as u64);
    let mut summary = GeocodeSummary::default();

    for row in 0..dataset.len() {
        progress.inc(1);

        let has_coords = !dataset.get(row, &columns.latitude).trim().is_empty()
            && !dataset.get(row, &columns.longitude).trim().is_empty();
        let address = dataset.get(row, &columns.address).trim().to_owned();
        if has_coords || address.is_empty() {
            summary.skipped += 1;
            continue;
        }

        progress.set_message(address.clone());
        let result = geocode_address(client, &config.services, &address).await;
        tokio::time::sleep(config.pause()).await;
        match result {
            Ok(Some(hit)) => {
                log::info!(
                    "{address} -> ({:.6}, {:.6}) via {:?}",
                    hit.latitude,
                    hit.longitude,
                    hit.provider
                );
                dataset.set(row, &columns.latitude, format_coordinate(hit.latitude));
                dataset.set(row, &columns.longitude, format_coordinate(hit.longitude));
                summary.geocoded += 1;
            }
            Ok(None) => {
                log::info!("{address}: no match");
                summary.unmatched += 1;
            }
            Err(e) => {
                log::warn!("{address}: geocoding failed: {e}");
                summary.failed += 1;
            }
        }
    }

    progress.finish(format!(
        "{} geocoded, {} unmatched, {} skipped",
        summary.geocoded, summary.unmatched, summary.skipped
    ));
    Ok(summary)
}
