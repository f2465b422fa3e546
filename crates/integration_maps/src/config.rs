//! Maps service configuration

use serde::{Deserialize, Serialize};

/// Configuration for geocoding and directions providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_nominatim_base_url")]
    pub nominatim_base_url: String,

    /// Base URL for the Google Maps web services
    #[serde(default = "default_google_base_url")]
    pub google_base_url: String,

    /// Google Maps API key; without it the secondary geocoder is skipped
    /// and directions are unavailable
    #[serde(default)]
    pub google_api_key: Option<String>,

    /// Geocoding request timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub geocoding_timeout_secs: u64,

    /// Directions request timeout in seconds
    #[serde(default = "default_directions_timeout_secs")]
    pub directions_timeout_secs: u64,

    /// Minimum spacing between Nominatim requests in milliseconds
    #[serde(default = "default_nominatim_min_interval_ms")]
    pub nominatim_min_interval_ms: u64,

    /// Country code filter for Nominatim (empty for worldwide)
    #[serde(default)]
    pub country_filter: String,

    /// User agent sent to every provider
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_google_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    5
}

const fn default_directions_timeout_secs() -> u64 {
    10
}

const fn default_nominatim_min_interval_ms() -> u64 {
    1100
}

fn default_user_agent() -> String {
    "Chauffeur/1.0".to_string()
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            nominatim_base_url: default_nominatim_base_url(),
            google_base_url: default_google_base_url(),
            google_api_key: None,
            geocoding_timeout_secs: default_geocoding_timeout_secs(),
            directions_timeout_secs: default_directions_timeout_secs(),
            nominatim_min_interval_ms: default_nominatim_min_interval_ms(),
            country_filter: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

impl MapsConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            google_api_key: Some("test-key".to_string()),
            geocoding_timeout_secs: 2,
            directions_timeout_secs: 2,
            nominatim_min_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if a usable Google API key is configured
    #[must_use]
    pub fn has_google_key(&self) -> bool {
        self.google_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.nominatim_base_url.is_empty() {
            return Err("nominatim_base_url must not be empty".to_string());
        }

        if self.google_base_url.is_empty() {
            return Err("google_base_url must not be empty".to_string());
        }

        if self.geocoding_timeout_secs == 0 || self.directions_timeout_secs == 0 {
            return Err("timeouts must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapsConfig::default();
        assert_eq!(config.nominatim_base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.google_base_url, "https://maps.googleapis.com");
        assert_eq!(config.geocoding_timeout_secs, 5);
        assert_eq!(config.directions_timeout_secs, 10);
        assert_eq!(config.nominatim_min_interval_ms, 1100);
        assert!(!config.has_google_key());
    }

    #[test]
    fn test_testing_config() {
        let config = MapsConfig::for_testing();
        assert!(config.has_google_key());
        assert_eq!(config.nominatim_min_interval_ms, 0);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = MapsConfig {
            google_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!config.has_google_key());
    }

    #[test]
    fn test_validation() {
        assert!(MapsConfig::default().validate().is_ok());

        let config = MapsConfig {
            directions_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MapsConfig {
            nominatim_base_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: MapsConfig =
            serde_json::from_str(r#"{"google_api_key": "abc"}"#).unwrap();
        assert_eq!(config.google_api_key.as_deref(), Some("abc"));
        assert_eq!(config.geocoding_timeout_secs, 5);
    }
}
