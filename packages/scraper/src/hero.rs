//! Hero image extraction from listing pages.
//!
//! Listing pages announce their main photo in one of two places:
//!
//! 1. `<link rel="preload" as="image" href="...">` (preferred; this is the
//!    full-size photo the page renders first)
//! 2. `<meta property="og:image" content="...">` (social preview fallback)

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::retry;

static PRELOAD_IMAGE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel~="preload"][as="image"]"#).expect("valid selector")
});

static OG_IMAGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).expect("valid selector"));

/// Extracts the hero image URL from listing page HTML.
///
/// Only the first element of each kind is considered; an empty attribute
/// falls through to the next source.
#[must_use]
pub fn extract_hero_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let preload = document
        .select(&PRELOAD_IMAGE_SEL)
        .next()
        .and_then(|el| el.value().attr("href"))
        .filter(|href| !href.is_empty());
    if let Some(href) = preload {
        return Some(href.to_owned());
    }

    document
        .select(&OG_IMAGE_SEL)
        .next()
        .and_then(|el| el.value().attr("content"))
        .filter(|content| !content.is_empty())
        .map(str::to_owned)
}

/// Fetches a listing page and extracts its hero image URL.
///
/// Fetch failures are logged and reported as `None`: a missing image is
/// not fatal to the row being enriched.
pub async fn fetch_hero_image(client: &reqwest::Client, listing_url: &str) -> Option<String> {
    match retry::send_text(|| client.get(listing_url)).await {
        Ok(html) => {
            let image = extract_hero_image(&html);
            if image.is_none() {
                log::debug!("No hero image tags on {listing_url}");
            }
            image
        }
        Err(e) => {
            log::warn!("Error fetching hero image from {listing_url}: {e}");
            None
        }
    }
}
