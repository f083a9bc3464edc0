#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address geocoding for the listing dataset.
//!
//! [`geocode_address`] walks the providers of a [`GeocoderConfig`] in
//! priority order. The built-in setup asks the Google Geocoding API first
//! (when `GOOGLE_API_KEY` is set) and falls back to `OpenStreetMap`
//! Nominatim.

pub mod config;
pub mod google;
pub mod nominatim;

use std::time::Duration;

use thiserror::Error;

pub use crate::config::{GeocoderConfig, GeocodingService, ProviderConfig};

/// Per-request timeout for every provider.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Coordinates for an address.
#[derive(Debug, Clone)]
pub struct GeocodedAddress {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Canonical address reported by the provider.
    pub matched_address: Option<String>,
    pub provider: GeocodingProvider,
    pub match_quality: MatchQuality,
}

/// Which provider resolved an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodingProvider {
    Google,
    Nominatim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    /// Rooftop-accurate.
    Exact,
    Approximate,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The provider answered but refused the request.
    #[error("Provider returned {status}: {message}")]
    Status { status: String, message: String },

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid geocoder config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Geocodes a free-text address (`"123 Main St, Springfield, OR"`) by asking
/// each service in turn until one returns coordinates.
///
/// Services that need a key are skipped when the key is not configured. A
/// provider that errors is logged and the next one is tried.
///
/// # Errors
///
/// Returns the last [`GeocodeError`] only when every provider that was
/// asked failed; a clean miss from any provider yields `Ok(None)`.
pub async fn geocode_address(
    client: &reqwest::Client,
    services: &[GeocodingService],
    address: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let address = address.trim();
    if address.is_empty() {
        return Ok(None);
    }

    let mut last_error = None;
    let mut any_answered = false;

    for service in services {
        let result = match &service.provider {
            ProviderConfig::Google { endpoint, key_env } => {
                let Some(key) = service.api_key() else {
                    log::debug!("{}: {key_env} not set, skipping", service.id);
                    continue;
                };
                google::geocode(client, endpoint, &key, address).await
            }
            ProviderConfig::Nominatim {
                endpoint,
                user_agent,
            } => nominatim::geocode(client, endpoint, user_agent, address).await,
        };

        match result {
            Ok(Some(hit)) => {
                log::debug!(
                    "{} matched '{address}' at ({}, {})",
                    service.id,
                    hit.latitude,
                    hit.longitude
                );
                return Ok(Some(hit));
            }
            Ok(None) => {
                any_answered = true;
                log::debug!("{} found no match for '{address}'", service.id);
            }
            Err(e) => {
                log::warn!("{} failed for '{address}': {e}", service.id);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if !any_answered => Err(e),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_address_is_not_sent_to_any_provider() {
        let client = reqwest::Client::new();
        let config = GeocoderConfig::embedded().unwrap();
        assert!(
            geocode_address(&client, &config.services, "   ")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn no_services_means_no_match() {
        let client = reqwest::Client::new();
        assert!(
            geocode_address(&client, &[], "123 Main St, Springfield, OR")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn keyless_google_is_skipped_without_a_request() {
        let config = GeocoderConfig::from_toml(
            r#"
            [[services]]
            id = "google"
            name = "Google"
            priority = 1
            provider = { type = "google", endpoint = "http://127.0.0.1:9/geocode", key_env = "LISTING_ENRICH_TEST_NEVER_SET_KEY" }
            "#,
        )
        .unwrap();
        let client = reqwest::Client::new();
        assert!(
            geocode_address(&client, &config.services, "123 Main St, Springfield, OR")
                .await
                .unwrap()
                .is_none()
        );
    }
}
