//! `OpenStreetMap` Nominatim search client.
//!
//! Nominatim's usage policy requires an identifying `User-Agent` and allows
//! at most one request per second; pacing is left to the caller.
//!
//! See <https://nominatim.org/release-docs/latest/api/Search/>

use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::{GeocodeError, GeocodedAddress, GeocodingProvider, MatchQuality, REQUEST_TIMEOUT};

/// Nominatim returns coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Runs a free-form `q` search and returns the top place.
///
/// # Errors
///
/// Returns [`GeocodeError`] on HTTP failure (429 maps to
/// [`GeocodeError::RateLimited`]) or a malformed body.
pub async fn geocode(
    client: &reqwest::Client,
    endpoint: &str,
    user_agent: &str,
    query: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let resp = client
        .get(endpoint)
        .header(USER_AGENT, user_agent)
        .query(&[("q", query), ("format", "json"), ("limit", "1")])
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }
    let body = resp.error_for_status()?.text().await?;
    parse_response(&body)
}

fn parse_response(body: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let places: Vec<Place> = serde_json::from_str(body).map_err(|e| GeocodeError::Parse {
        message: format!("Nominatim response: {e}"),
    })?;
    let Some(place) = places.into_iter().next() else {
        return Ok(None);
    };

    let coordinate = |name: &str, text: &str| {
        text.trim().parse::<f64>().map_err(|_| GeocodeError::Parse {
            message: format!("Nominatim {name} is not a number: {text:?}"),
        })
    };

    Ok(Some(GeocodedAddress {
        latitude: coordinate("lat", &place.lat)?,
        longitude: coordinate("lon", &place.lon)?,
        matched_address: place.display_name,
        provider: GeocodingProvider::Nominatim,
        match_quality: MatchQuality::Approximate,
    }))
}
