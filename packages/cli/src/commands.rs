//! Implementations of the CLI subcommands.
//!
//! Shared by the argument-driven entry point and the interactive menu.

use std::path::Path;

use indicatif::MultiProgress;
use listing_enrich::clean::clean_dataset;
use listing_enrich::geocode::geocode_dataset;
use listing_enrich::listing::{EnrichOptions, enrich_listings, scrape_address};
use listing_enrich::street_view::{API_KEY_ENV, StreetViewConfig, add_street_view_urls};
use listing_enrich::{Columns, EnrichError, api_client, require_env, rewrite_file};
use listing_enrich_address::AddressMatcher;
use listing_enrich_geocoder::{GeocoderConfig, ProviderConfig};
use listing_enrich_scraper::search::SearchConfig;
use listing_enrich_scraper::{DEFAULT_TIMEOUT, build_client};

use crate::progress::IndicatifProgress;

/// Blanks listing URL/image cells that do not match the row's address.
/// Writes back to `input` when `output` is `None`.
///
/// # Errors
///
/// Returns [`EnrichError`] if the CSV cannot be read, cleaned, or written.
pub async fn clean(
    multi: &MultiProgress,
    columns: &Columns,
    matcher: AddressMatcher,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), EnrichError> {
    let output = output.unwrap_or(input);
    let bar = IndicatifProgress::rows_bar(multi, "Checking listing URLs");
    let summary = rewrite_file(input, output, |mut dataset| async move {
        let summary = clean_dataset(&mut dataset, columns, &matcher, &bar)?;
        Ok::<_, EnrichError>((dataset, summary))
    })
    .await?;

    println!(
        "Kept {} listing URLs, cleared {}",
        summary.kept(),
        summary.cleared
    );
    Ok(())
}

/// Adds a street-view image URL column.
///
/// # Errors
///
/// Returns [`EnrichError::MissingEnv`] before touching any file if the API
/// key is not set, or any CSV error.
pub async fn street_images(
    multi: &MultiProgress,
    columns: &Columns,
    input: &Path,
    output: &Path,
) -> Result<(), EnrichError> {
    let key = require_env(API_KEY_ENV)?;
    let config = StreetViewConfig::default();
    let bar = IndicatifProgress::rows_bar(multi, "Building street view URLs");

    let count = rewrite_file(input, output, |mut dataset| async move {
        let count = add_street_view_urls(&mut dataset, columns, &config, &key, &bar);
        Ok::<_, EnrichError>((dataset, count))
    })
    .await?;

    println!("Added street view URLs for {count} rows");
    Ok(())
}

/// Searches listing pages and hero images for rows that lack an image.
///
/// # Errors
///
/// Returns [`EnrichError`] if the CSV cannot be read or written.
pub async fn enrich(
    multi: &MultiProgress,
    columns: &Columns,
    input: &Path,
    output: &Path,
    options: EnrichOptions,
) -> Result<(), EnrichError> {
    let client = build_client(DEFAULT_TIMEOUT)?;
    let bar = IndicatifProgress::rows_bar(multi, "Searching listings");

    let summary = rewrite_file(input, output, |mut dataset| async move {
        let summary = enrich_listings(&client, &mut dataset, columns, &options, &bar).await?;
        Ok::<_, EnrichError>((dataset, summary))
    })
    .await?;

    println!(
        "Found {} listings ({} with images); {} not found, {} failed, {} skipped",
        summary.found, summary.with_image, summary.not_found, summary.failed, summary.skipped
    );
    Ok(())
}

/// Fills in missing latitude/longitude.
///
/// `providers` restricts geocoding to the given service IDs (`google`,
/// `osm`); empty means every enabled service.
///
/// # Errors
///
/// Returns [`EnrichError`] if the CSV cannot be read or written.
pub async fn geocode(
    multi: &MultiProgress,
    columns: &Columns,
    input: &Path,
    output: &Path,
    providers: &[String],
) -> Result<(), EnrichError> {
    let ids: Vec<&str> = providers.iter().map(String::as_str).collect();
    let config = GeocoderConfig::embedded()?.only(&ids);
    for service in &config.services {
        if let ProviderConfig::Google { key_env, .. } = &service.provider
            && service.api_key().is_none()
        {
            log::warn!("{key_env} not set; skipping {}", service.name);
        }
    }
    log::info!(
        "Geocoding with: {}",
        config
            .services
            .iter()
            .map(|s| s.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let client = api_client()?;
    let bar = IndicatifProgress::rows_bar(multi, "Geocoding");

    let summary = rewrite_file(input, output, |mut dataset| async move {
        let summary = geocode_dataset(&client, &config, &mut dataset, columns, &bar).await?;
        Ok::<_, EnrichError>((dataset, summary))
    })
    .await?;

    println!(
        "Geocoded {} rows; {} unmatched, {} failed, {} skipped",
        summary.geocoded, summary.unmatched, summary.failed, summary.skipped
    );
    Ok(())
}

/// Looks up the listing and hero image for a single address, optionally
/// saving the image into `image_dir`.
///
/// # Errors
///
/// Returns [`EnrichError`] if the search request fails.
pub async fn hero(address: &str, image_dir: Option<&Path>) -> Result<(), EnrichError> {
    let client = build_client(DEFAULT_TIMEOUT)?;
    println!("Address: {address}");

    let Some(result) =
        scrape_address(&client, &SearchConfig::default(), address, image_dir).await?
    else {
        println!("No listing found");
        return Ok(());
    };

    println!("Listing URL: {}", result.listing_url);
    match &result.image_url {
        Some(image) => println!("Hero image: {image}"),
        None => println!("Hero image not found on listing page"),
    }
    if let Some(path) = &result.saved_to {
        println!("Saved to {}", path.display());
    }
    Ok(())
}
