//! Geocoder configuration.
//!
//! The default provider list is embedded from `services/geocoders.toml`;
//! [`GeocoderConfig::from_toml`] accepts the same format for custom setups.

use std::time::Duration;

use serde::Deserialize;

use crate::GeocodeError;

const EMBEDDED: &str = include_str!("../services/geocoders.toml");

/// Provider list plus the pacing applied between geocoded rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocoderConfig {
    /// Delay after each geocoded row, in milliseconds.
    #[serde(default)]
    pub pause_ms: u64,
    /// Providers in the order they are tried.
    #[serde(default)]
    pub services: Vec<GeocodingService>,
}

/// One geocoding provider.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Short identifier used on the command line (`google`, `osm`).
    pub id: String,
    pub name: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Lower runs first.
    pub priority: u32,
    pub provider: ProviderConfig,
}

/// Provider-specific settings, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Google Geocoding API. Skipped when the key variable is unset.
    Google {
        endpoint: String,
        /// Environment variable holding the API key.
        key_env: String,
    },
    /// `OpenStreetMap` Nominatim search.
    Nominatim {
        endpoint: String,
        /// Nominatim rejects anonymous clients.
        user_agent: String,
    },
}

const fn enabled_by_default() -> bool {
    true
}

impl GeocoderConfig {
    /// Parses a configuration, dropping disabled services and sorting the
    /// rest by priority.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the TOML is malformed.
    pub fn from_toml(text: &str) -> Result<Self, GeocodeError> {
        let mut config: Self = toml::de::from_str(text)?;
        config.services.retain(|s| s.enabled);
        config.services.sort_by_key(|s| s.priority);
        Ok(config)
    }

    /// The built-in Google then Nominatim setup.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the embedded TOML is malformed.
    pub fn embedded() -> Result<Self, GeocodeError> {
        Self::from_toml(EMBEDDED)
    }

    /// Keeps only the services whose id is in `ids`. An empty list keeps
    /// everything.
    #[must_use]
    pub fn only(mut self, ids: &[&str]) -> Self {
        if !ids.is_empty() {
            self.services.retain(|s| ids.contains(&s.id.as_str()));
        }
        self
    }

    #[must_use]
    pub const fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

impl GeocodingService {
    /// API key for providers that need one, read from the environment.
    ///
    /// `None` for providers without a key, and for key variables that are
    /// unset or blank.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        match &self.provider {
            ProviderConfig::Google { key_env, .. } => std::env::var(key_env)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            ProviderConfig::Nominatim { .. } => None,
        }
    }
}
