//! Listing search and hero image enrichment.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use listing_enrich_scraper::download::download_image;
use listing_enrich_scraper::hero::fetch_hero_image;
use listing_enrich_scraper::search::{SearchConfig, find_listing_url};

use crate::progress::ProgressCallback;
use crate::{Columns, Dataset, EnrichError};

/// Default pause between processed rows.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(1500);

/// Options for [`enrich_listings`].
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Search configuration.
    pub search: SearchConfig,
    /// Pause after each row that found a listing.
    pub pause: Duration,
    /// Stop after this many rows have been searched.
    pub limit: Option<usize>,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            pause: DEFAULT_PAUSE,
            limit: None,
        }
    }
}

/// Outcome counts of an enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    /// Rows where a listing was found (with or without an image).
    pub found: usize,
    /// Rows among `found` that also got a hero image.
    pub with_image: usize,
    /// Rows skipped because the address was empty or the image was already
    /// present.
    pub skipped: usize,
    /// Rows where the search returned no listing.
    pub not_found: usize,
    /// Rows where the search request itself failed.
    pub failed: usize,
}

/// Searches for a listing page and hero image for every row that does not
/// have an image yet.
///
/// The listing URL and image columns are appended if missing. A failed
/// search is logged and counted; it does not stop the pass.
///
/// # Errors
///
/// Returns [`EnrichError::Dataset`] if the address column is missing.
pub async fn enrich_listings(
    client: &reqwest::Client,
    dataset: &mut Dataset,
    columns: &Columns,
    options: &EnrichOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<EnrichSummary, EnrichError> {
    dataset.require_column(&columns.address)?;
    dataset.ensure_column(&columns.listing_url);
    dataset.ensure_column(&columns.listing_image);

    progress.set_total(dataset.len() as u64);
    let mut summary = EnrichSummary::default();
    let mut searched = 0;

    for row in 0..dataset.len() {
        progress.inc(1);

        let address = dataset.get(row, &columns.address).trim().to_owned();
        if address.is_empty() || !dataset.get(row, &columns.listing_image).is_empty() {
            summary.skipped += 1;
            continue;
        }
        if options.limit.is_some_and(|limit| searched >= limit) {
            summary.skipped += 1;
            continue;
        }
        searched += 1;

        progress.set_message(address.clone());
        log::info!("Processing: {address}");

        let listing = match find_listing_url(client, &options.search, &address).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                log::info!("  no listing found");
                summary.not_found += 1;
                continue;
            }
            Err(e) => {
                log::warn!("  search failed: {e}");
                summary.failed += 1;
                continue;
            }
        };

        let image = fetch_hero_image(client, &listing).await.unwrap_or_default();
        log::info!(
            "  {listing} {}",
            if image.is_empty() { "(no img)" } else { "(img)" }
        );

        summary.found += 1;
        if !image.is_empty() {
            summary.with_image += 1;
        }
        dataset.set(row, &columns.listing_url, listing);
        dataset.set(row, &columns.listing_image, image);

        tokio::time::sleep(options.pause).await;
    }

    progress.finish(format!(
        "{} found, {} not found, {} skipped",
        summary.found, summary.not_found, summary.skipped
    ));
    Ok(summary)
}

/// Result of scraping a single address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroScrape {
    /// Listing page URL.
    pub listing_url: String,
    /// Hero image URL, if the page had one.
    pub image_url: Option<String>,
    /// Where the image was saved, if it was downloaded.
    pub saved_to: Option<PathBuf>,
}

/// Finds the listing and hero image for one address, optionally downloading
/// the image into `download_dir`.
///
/// Returns `Ok(None)` if no listing was found. A failed download is logged
/// and leaves `saved_to` empty.
///
/// # Errors
///
/// Returns [`EnrichError::Scrape`] if the search request fails.
pub async fn scrape_address(
    client: &reqwest::Client,
    search: &SearchConfig,
    address: &str,
    download_dir: Option<&Path>,
) -> Result<Option<HeroScrape>, EnrichError> {
    let Some(listing_url) = find_listing_url(client, search, address).await? else {
        return Ok(None);
    };
    let image_url = fetch_hero_image(client, &listing_url).await;

    let saved_to = match (&image_url, download_dir) {
        (Some(image), Some(dir)) => match download_image(client, image, dir, address).await {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Download failed: {e}");
                None
            }
        },
        _ => None,
    };

    Ok(Some(HeroScrape {
        listing_url,
        image_url,
        saved_to,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    #[tokio::test]
    async fn skips_rows_without_address_or_with_image() {
        let mut ds = Dataset::from_reader(
            "Full_Address,Redfin_Image\n,\n\"1 Elm St, X\",https://img/1.jpg\n".as_bytes(),
        )
        .unwrap();
        let client = reqwest::Client::new();
        let summary = enrich_listings(
            &client,
            &mut ds,
            &Columns::default(),
            &EnrichOptions::default(),
            &null_progress(),
        )
        .await
        .unwrap();

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.found + summary.not_found + summary.failed, 0);
        assert!(ds.has_column("Redfin_URL"));
        assert_eq!(ds.get(1, "Redfin_Image"), "https://img/1.jpg");
    }

    #[tokio::test]
    async fn zero_limit_searches_nothing() {
        let mut ds =
            Dataset::from_reader("Full_Address\n\"1 Elm St, X\"\n\"2 Elm St, X\"\n".as_bytes())
                .unwrap();
        let options = EnrichOptions {
            limit: Some(0),
            ..EnrichOptions::default()
        };
        let summary = enrich_listings(
            &reqwest::Client::new(),
            &mut ds,
            &Columns::default(),
            &options,
            &null_progress(),
        )
        .await
        .unwrap();
        assert_eq!(summary.skipped, 2);
        assert_eq!(ds.headers(), ["Full_Address", "Redfin_URL", "Redfin_Image"]);
    }

    #[tokio::test]
    async fn requires_address_column() {
        let mut ds = Dataset::from_reader("Other\nx\n".as_bytes()).unwrap();
        let result = enrich_listings(
            &reqwest::Client::new(),
            &mut ds,
            &Columns::default(),
            &EnrichOptions::default(),
            &null_progress(),
        )
        .await;
        assert!(result.is_err());
    }
}
