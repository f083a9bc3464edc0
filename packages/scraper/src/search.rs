//! Listing URL search.
//!
//! Runs a DuckDuckGo HTML search for `"{address} redfin"` and returns the
//! first result on the listing domain. Result links on the HTML endpoint
//! are wrapped in a `/l/?uddg=<target>` redirect which is unwrapped here.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::{ScrapeError, retry};

static RESULT_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("valid selector"));

/// Configuration for listing searches.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Search endpoint (queried with `?q=`).
    pub endpoint: String,
    /// Substring a result URL must contain to be accepted.
    pub listing_domain: String,
    /// Term appended to the address to steer the search.
    pub query_suffix: String,
    /// Number of result links to inspect.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://html.duckduckgo.com/html/".to_owned(),
            listing_domain: "redfin.com".to_owned(),
            query_suffix: "redfin".to_owned(),
            max_results: 15,
        }
    }
}

impl SearchConfig {
    /// Sets the number of result links to inspect.
    #[must_use]
    pub const fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Builds the search query for an address.
    #[must_use]
    pub fn query(&self, address: &str) -> String {
        if self.query_suffix.is_empty() {
            address.to_owned()
        } else {
            format!("{address} {}", self.query_suffix)
        }
    }
}

/// Searches for a listing page for `address`.
///
/// Returns `Ok(None)` when no result on the listing domain is found.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the search request itself fails.
pub async fn find_listing_url(
    client: &reqwest::Client,
    config: &SearchConfig,
    address: &str,
) -> Result<Option<String>, ScrapeError> {
    let query = config.query(address);
    log::debug!("Searching: {query}");

    let html = retry::send_text(|| client.get(&config.endpoint).query(&[("q", query.as_str())]))
        .await?;

    Ok(first_listing_result(&html, config))
}

/// Picks the first listing-domain result from a search results page, with
/// its query string removed.
#[must_use]
pub fn first_listing_result(html: &str, config: &SearchConfig) -> Option<String> {
    result_links(html)
        .into_iter()
        .take(config.max_results)
        .find(|href| href.contains(&config.listing_domain))
        .map(|href| strip_query(&href).to_owned())
}

/// Returns the target URLs of all result links, in page order.
#[must_use]
pub fn result_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_LINK_SEL)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(unwrap_redirect)
        .collect()
}

/// Resolves a result `href` to the target URL.
///
/// Protocol-relative redirect links (`//duckduckgo.com/l/?uddg=...`) are
/// decoded; absolute links are returned as-is. Anything else is dropped.
fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_owned()
    };
    let url = Url::parse(&absolute).ok()?;

    if url.path() == "/l/" {
        return url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned());
    }

    Some(absolute)
}

/// Drops everything from the first `?`.
fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"<html><body>
        <div class="result"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.zillow.com%2Fhomedetails%2F123-Main-St&amp;rut=abc">Zillow</a></div>
        <div class="result"><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.redfin.com%2FOR%2FPortland%2F123-Main-St-97201%2Fhome%2F42%3Futm%3Dx&amp;rut=def">Redfin</a></div>
        <div class="result"><a class="result__a" href="https://www.redfin.com/OR/Portland/other/home/7">Other</a></div>
    </body></html>"#;

    #[test]
    fn unwraps_redirect_links_in_order() {
        let links = result_links(RESULTS);
        assert_eq!(
            links,
            vec![
                "https://www.zillow.com/homedetails/123-Main-St",
                "https://www.redfin.com/OR/Portland/123-Main-St-97201/home/42?utm=x",
                "https://www.redfin.com/OR/Portland/other/home/7",
            ]
        );
    }

    #[test]
    fn picks_first_listing_domain_result_without_query() {
        assert_eq!(
            first_listing_result(RESULTS, &SearchConfig::default()).as_deref(),
            Some("https://www.redfin.com/OR/Portland/123-Main-St-97201/home/42")
        );
    }

    #[test]
    fn respects_max_results() {
        let config = SearchConfig::default().with_max_results(1);
        assert_eq!(first_listing_result(RESULTS, &config), None);
    }

    #[test]
    fn returns_none_without_results() {
        assert_eq!(
            first_listing_result("<html><body>No results.</body></html>", &SearchConfig::default()),
            None
        );
    }

    #[test]
    fn builds_query_with_suffix() {
        assert_eq!(
            SearchConfig::default().query("4260 SW Council Crest Dr, Portland, OR"),
            "4260 SW Council Crest Dr, Portland, OR redfin"
        );
    }

    #[test]
    fn drops_unparseable_links() {
        assert_eq!(unwrap_redirect("/relative/path"), None);
        assert_eq!(strip_query("https://a.example/x"), "https://a.example/x");
    }
}
