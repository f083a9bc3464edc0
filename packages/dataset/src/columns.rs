//! Column names used by the enrichment tools.

/// Names of the columns the enrichment tools read and write.
///
/// Defaults match the export format of the address spreadsheet; any of them
/// can be overridden from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    /// Full free-text address (`"123 Main St, Springfield, OR"`).
    pub address: String,
    /// Listing page URL.
    pub listing_url: String,
    /// Listing hero image URL.
    pub listing_image: String,
    /// Latitude (WGS84).
    pub latitude: String,
    /// Longitude (WGS84).
    pub longitude: String,
    /// Street-view static image URL.
    pub street_image: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            address: "Full_Address".to_owned(),
            listing_url: "Redfin_URL".to_owned(),
            listing_image: "Redfin_Image".to_owned(),
            latitude: "Latitude".to_owned(),
            longitude: "Longitude".to_owned(),
            street_image: "Street_Image_URL".to_owned(),
        }
    }
}

impl Columns {
    /// Overrides the address column name.
    #[must_use]
    pub fn with_address(mut self, name: &str) -> Self {
        name.clone_into(&mut self.address);
        self
    }
}
