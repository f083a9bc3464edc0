#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listing page scraping for address enrichment.
//!
//! - [`search`] finds a listing URL for a free-text address through a web
//!   search.
//! - [`hero`] pulls the hero image URL out of a listing page.
//! - [`download`] saves an image to disk under a slugified file name.
//!
//! All HTTP goes through [`retry`], which retries transient failures with
//! exponential backoff.

pub mod download;
pub mod hero;
pub mod retry;
pub mod search;

use std::time::Duration;

/// Desktop browser `User-Agent` sent with every request. Listing sites
/// serve a stripped page (without the hero image tags) to unknown agents.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124 Safari/537.36";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors that can occur during scraping operations.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: reqwest::StatusCode,
        /// Final request URL.
        url: String,
    },

    /// Parsing a URL or page failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds a [`reqwest::Client`] with the browser `User-Agent` and the given
/// timeout.
///
/// # Errors
///
/// Returns [`ScrapeError::Http`] if the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ScrapeError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(ScrapeError::Http)
}
