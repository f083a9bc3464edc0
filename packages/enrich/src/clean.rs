//! Listing URL cleanup.
//!
//! Web searches often return a listing for a different property. For each
//! row, the street part of the address is normalized and checked against
//! the row's listing URL; on a mismatch the listing URL and hero image are
//! cleared so a later enrichment pass can retry them.

use std::sync::Arc;

use listing_enrich_address::{AddressMatcher, MatchKind, normalize, street_part};

use crate::progress::ProgressCallback;
use crate::{Columns, Dataset, EnrichError};

/// Outcome counts of a cleanup pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    /// Kept rows whose address named a road suffix the URL repeats.
    pub with_suffix: usize,
    /// Kept rows whose address has no road suffix.
    pub bare: usize,
    /// Rows whose listing URL (and image) were cleared.
    pub cleared: usize,
}

impl CleanSummary {
    /// Total rows whose listing URL was kept.
    #[must_use]
    pub const fn kept(&self) -> usize {
        self.with_suffix + self.bare
    }
}

/// Clears listing URL and image cells whose URL does not reference the
/// row's address.
///
/// The image column is optional; the address and listing URL columns are
/// required.
///
/// # Errors
///
/// Returns [`EnrichError::Dataset`] if a required column is missing.
pub fn clean_dataset(
    dataset: &mut Dataset,
    columns: &Columns,
    matcher: &AddressMatcher,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<CleanSummary, EnrichError> {
    dataset.require_column(&columns.address)?;
    dataset.require_column(&columns.listing_url)?;
    let has_image = dataset.has_column(&columns.listing_image);

    progress.set_total(dataset.len() as u64);
    let mut summary = CleanSummary::default();

    for row in 0..dataset.len() {
        let address = normalize(street_part(dataset.get(row, &columns.address)));
        let url = dataset.get(row, &columns.listing_url);

        match matcher.match_kind(url, &address) {
            Some(kind) => {
                log::trace!("Row {row}: kept {url} ({kind:?})");
                match kind {
                    MatchKind::WithSuffix => summary.with_suffix += 1,
                    MatchKind::Bare => summary.bare += 1,
                }
            }
            None => {
                if !url.is_empty() {
                    log::debug!("Row {row}: '{address}' not in {url}, clearing");
                }
                dataset.set(row, &columns.listing_url, "");
                if has_image {
                    dataset.set(row, &columns.listing_image, "");
                }
                summary.cleared += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish(format!(
        "{} kept, {} cleared",
        summary.kept(),
        summary.cleared
    ));
    log::info!(
        "Cleanup complete: {} kept ({} without a road suffix), {} cleared",
        summary.kept(),
        summary.bare,
        summary.cleared
    );
    Ok(summary)
}
