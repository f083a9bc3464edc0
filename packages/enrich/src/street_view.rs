//! Street-view static image URLs.
//!
//! Uses only the officially supported Street View Static API: the URL is
//! built from the row's coordinates and the caller's API key, and nothing
//! is fetched here.

use std::sync::Arc;

use crate::progress::ProgressCallback;
use crate::{Columns, Dataset};

/// Environment variable holding the Street View Static API key.
pub const API_KEY_ENV: &str = "GOOGLE_STREETVIEW_KEY";

/// Static image parameters.
#[derive(Debug, Clone)]
pub struct StreetViewConfig {
    /// API endpoint.
    pub endpoint: String,
    /// Image size as `WIDTHxHEIGHT`.
    pub size: String,
    /// Horizontal field of view in degrees.
    pub fov: u32,
    /// Camera pitch in degrees.
    pub pitch: i32,
}

impl Default for StreetViewConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://maps.googleapis.com/maps/api/streetview".to_owned(),
            size: "640x640".to_owned(),
            fov: 80,
            pitch: 0,
        }
    }
}

impl StreetViewConfig {
    /// Builds the image URL for a coordinate pair.
    #[must_use]
    pub fn image_url(&self, lat: &str, lon: &str, key: &str) -> String {
        format!(
            "{}?size={}&location={lat},{lon}&fov={}&pitch={}&key={key}",
            self.endpoint, self.size, self.fov, self.pitch
        )
    }
}

/// Sets the street image column on every row: rows with both coordinates
/// get an image URL, the rest get an empty cell. The column is appended if
/// it does not exist yet.
///
/// Returns the number of rows that received a URL.
pub fn add_street_view_urls(
    dataset: &mut Dataset,
    columns: &Columns,
    config: &StreetViewConfig,
    api_key: &str,
    progress: &Arc<dyn ProgressCallback>,
) -> usize {
    dataset.ensure_column(&columns.street_image);
    progress.set_total(dataset.len() as u64);

    let mut with_image = 0;
    for row in 0..dataset.len() {
        // Whitespace-only cells count as missing.
        let lat = dataset.get(row, &columns.latitude).trim();
        let lon = dataset.get(row, &columns.longitude).trim();

        let url = if lat.is_empty() || lon.is_empty() {
            String::new()
        } else {
            with_image += 1;
            config.image_url(lat, lon, api_key)
        };
        dataset.set(row, &columns.street_image, url);
        progress.inc(1);
    }

    progress.finish(format!("{with_image}/{} rows with coordinates", dataset.len()));
    log::info!(
        "Street view URLs added for {with_image} of {} rows",
        dataset.len()
    );
    with_image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::null_progress;

    #[test]
    fn builds_image_url() {
        assert_eq!(
            StreetViewConfig::default().image_url("45.5", "-122.7", "KEY"),
            "https://maps.googleapis.com/maps/api/streetview\
             ?size=640x640&location=45.5,-122.7&fov=80&pitch=0&key=KEY"
        );
    }

    #[test]
    fn fills_rows_with_coordinates_only() {
        let mut ds = Dataset::from_reader(
            "Full_Address,Latitude,Longitude\nA,45.5,-122.7\nB,,-122.7\nC,45.1,\n".as_bytes(),
        )
        .unwrap();
        let count = add_street_view_urls(
            &mut ds,
            &Columns::default(),
            &StreetViewConfig::default(),
            "KEY",
            &null_progress(),
        );
        assert_eq!(count, 1);
        assert_eq!(ds.headers().last().map(String::as_str), Some("Street_Image_URL"));
        assert!(ds.get(0, "Street_Image_URL").contains("location=45.5,-122.7"));
        assert_eq!(ds.get(1, "Street_Image_URL"), "");
        assert_eq!(ds.get(2, "Street_Image_URL"), "");
    }

    #[test]
    fn whitespace_coordinates_count_as_missing() {
        let mut ds = Dataset::from_reader(
            "Full_Address,Latitude,Longitude\nA,\"  \",-122.7\nB, 45.5 , -122.7 \n".as_bytes(),
        )
        .unwrap();
        let count = add_street_view_urls(
            &mut ds,
            &Columns::default(),
            &StreetViewConfig::default(),
            "KEY",
            &null_progress(),
        );
        assert_eq!(count, 1);
        assert_eq!(ds.get(0, "Street_Image_URL"), "");
        assert!(ds.get(1, "Street_Image_URL").contains("location=45.5,-122.7&"));
    }

    #[test]
    fn overwrites_existing_column_in_place() {
        let mut ds = Dataset::from_reader(
            "Street_Image_URL,Latitude,Longitude\nstale,,\n".as_bytes(),
        )
        .unwrap();
        add_street_view_urls(
            &mut ds,
            &Columns::default(),
            &StreetViewConfig::default(),
            "KEY",
            &null_progress(),
        );
        assert_eq!(ds.headers().len(), 3);
        assert_eq!(ds.get(0, "Street_Image_URL"), "");
    }
}
