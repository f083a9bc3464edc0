//! Google Geocoding API client.
//!
//! See <https://developers.google.com/maps/documentation/geocoding/requests-geocoding>

use serde::Deserialize;

use crate::{GeocodeError, GeocodedAddress, GeocodingProvider, MatchQuality, REQUEST_TIMEOUT};

#[derive(Debug, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    results: Vec<Candidate>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    formatted_address: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
    location_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Looks up `address` and returns the first result.
///
/// # Errors
///
/// Returns [`GeocodeError`] on HTTP failure, a malformed body, or a status
/// other than `OK`/`ZERO_RESULTS`.
pub async fn geocode(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    address: &str,
) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let body = client
        .get(endpoint)
        .query(&[("address", address), ("key", api_key)])
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_response(&body)
}

/// Interprets a Geocoding API response body.
///
/// The API answers HTTP 200 even for quota and key problems, so the
/// `status` field decides the outcome.
fn parse_response(body: &str) -> Result<Option<GeocodedAddress>, GeocodeError> {
    let response: Response = serde_json::from_str(body).map_err(|e| GeocodeError::Parse {
        message: format!("Google response: {e}"),
    })?;

    match response.status.as_str() {
        "OK" => Ok(response.results.into_iter().next().map(|hit| GeocodedAddress {
            latitude: hit.geometry.location.lat,
            longitude: hit.geometry.location.lng,
            matched_address: hit.formatted_address,
            provider: GeocodingProvider::Google,
            match_quality: if hit.geometry.location_type.as_deref() == Some("ROOFTOP") {
                MatchQuality::Exact
            } else {
                MatchQuality::Approximate
            },
        })),
        "ZERO_RESULTS" => Ok(None),
        "OVER_QUERY_LIMIT" => Err(GeocodeError::RateLimited),
        _ => Err(GeocodeError::Status {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_result() {
        let body = r#"{
            "status": "OK",
            "results": [
                {
                    "formatted_address": "4260 SW Council Crest Dr, Portland, OR 97239, USA",
                    "geometry": {
                        "location": { "lat": 45.498765, "lng": -122.708123 },
                        "location_type": "ROOFTOP"
                    }
                },
                {
                    "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
                }
            ]
        }"#;
        let hit = parse_response(body).unwrap().unwrap();
        assert!((hit.latitude - 45.498_765).abs() < 1e-6);
        assert!((hit.longitude - -122.708_123).abs() < 1e-6);
        assert_eq!(hit.provider, GeocodingProvider::Google);
        assert_eq!(hit.match_quality, MatchQuality::Exact);
        assert_eq!(
            hit.matched_address.as_deref(),
            Some("4260 SW Council Crest Dr, Portland, OR 97239, USA")
        );
    }

    #[test]
    fn interpolated_location_is_approximate() {
        let body = r#"{"status":"OK","results":[{"geometry":{
            "location":{"lat":1.5,"lng":2.5},"location_type":"RANGE_INTERPOLATED"}}]}"#;
        let hit = parse_response(body).unwrap().unwrap();
        assert_eq!(hit.match_quality, MatchQuality::Approximate);
        assert!(hit.matched_address.is_none());
    }

    #[test]
    fn zero_results_is_a_miss() {
        assert!(
            parse_response(r#"{"status":"ZERO_RESULTS","results":[]}"#)
                .unwrap()
                .is_none()
        );
        assert!(
            parse_response(r#"{"status":"OK","results":[]}"#)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn quota_status_is_rate_limited() {
        assert!(matches!(
            parse_response(r#"{"status":"OVER_QUERY_LIMIT"}"#),
            Err(GeocodeError::RateLimited)
        ));
    }

    #[test]
    fn denied_status_carries_error_message() {
        let err = parse_response(
            r#"{"status":"REQUEST_DENIED","error_message":"The provided API key is invalid."}"#,
        )
        .unwrap_err();
        assert!(matches!(
            &err,
            GeocodeError::Status { status, message }
                if status == "REQUEST_DENIED" && message.contains("invalid")
        ));
    }

    #[test]
    fn garbage_body_is_a_parse_error() {
        assert!(matches!(
            parse_response("<html>"),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
