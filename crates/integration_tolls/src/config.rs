//! Toll estimation configuration

use serde::{Deserialize, Serialize};

/// Configuration for the TollGuru client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TollConfig {
    /// Feature flag; when off every estimate is a zero `Disabled` quote
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// TollGuru API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Origin-destination endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Vehicle class sent with every request
    #[serde(default = "default_vehicle_type")]
    pub vehicle_type: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Window in which identical failures are logged only once
    #[serde(default = "default_warn_debounce_secs")]
    pub warn_debounce_secs: u64,
}

const fn default_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.tollguru.com/toll/v2/origin-destination-waypoints".to_string()
}

fn default_vehicle_type() -> String {
    "2AxlesAuto".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_warn_debounce_secs() -> u64 {
    60
}

impl Default for TollConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: None,
            endpoint: default_endpoint(),
            vehicle_type: default_vehicle_type(),
            timeout_secs: default_timeout_secs(),
            warn_debounce_secs: default_warn_debounce_secs(),
        }
    }
}

impl TollConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-toll-key-1234".to_string()),
            timeout_secs: 2,
            ..Default::default()
        }
    }

    /// API key, if a non-blank one is configured
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }

        if self.vehicle_type.is_empty() {
            return Err("vehicle_type must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
