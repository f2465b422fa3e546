//! Application configuration

use std::fmt;
use std::path::Path;

use domain::{FarePolicy, Vehicle};
use integration_maps::MapsConfig;
use integration_tolls::TollConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment; missing API keys are reported as errors
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Geocoding and directions
    #[serde(default)]
    pub maps: MapsAppConfig,

    /// Toll estimation
    #[serde(default)]
    pub tolls: TollsAppConfig,

    /// Fare policy
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Invoice and payment backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,

    /// Booking and vehicle storage
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Vehicles seeded into an empty catalog
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

/// Maps configuration as loaded from file and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapsAppConfig {
    /// Nominatim base URL
    pub nominatim_base_url: String,
    /// Google Maps base URL
    pub google_base_url: String,
    /// Google API key (sensitive - uses SecretString)
    #[serde(skip_serializing)]
    pub google_api_key: Option<SecretString>,
    /// Geocoding timeout in seconds
    pub geocoding_timeout_secs: u64,
    /// Directions timeout in seconds
    pub directions_timeout_secs: u64,
    /// Minimum spacing between Nominatim requests
    pub nominatim_min_interval_ms: u64,
    /// ISO country codes Nominatim results are restricted to
    pub country_filter: String,
    /// User agent sent to the map providers
    pub user_agent: String,
}

impl Default for MapsAppConfig {
    fn default() -> Self {
        let defaults = MapsConfig::default();
        Self {
            nominatim_base_url: defaults.nominatim_base_url,
            google_base_url: defaults.google_base_url,
            google_api_key: None,
            geocoding_timeout_secs: defaults.geocoding_timeout_secs,
            directions_timeout_secs: defaults.directions_timeout_secs,
            nominatim_min_interval_ms: defaults.nominatim_min_interval_ms,
            country_filter: defaults.country_filter,
            user_agent: defaults.user_agent,
        }
    }
}

impl MapsAppConfig {
    /// Convert to the maps integration config, exposing the key
    #[must_use]
    pub fn to_maps_config(&self) -> MapsConfig {
        MapsConfig {
            nominatim_base_url: self.nominatim_base_url.clone(),
            google_base_url: self.google_base_url.clone(),
            google_api_key: self
                .google_api_key
                .as_ref()
                .map(|k| k.expose_secret().to_string()),
            geocoding_timeout_secs: self.geocoding_timeout_secs,
            directions_timeout_secs: self.directions_timeout_secs,
            nominatim_min_interval_ms: self.nominatim_min_interval_ms,
            country_filter: self.country_filter.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Toll configuration as loaded from file and environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TollsAppConfig {
    /// Feature flag
    pub enabled: bool,
    /// TollGuru API key (sensitive - uses SecretString)
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,
    /// Origin-destination endpoint
    pub endpoint: String,
    /// Vehicle class sent with every request
    pub vehicle_type: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Window in which identical failures are logged once
    pub warn_debounce_secs: u64,
}

impl Default for TollsAppConfig {
    fn default() -> Self {
        let defaults = TollConfig::default();
        Self {
            enabled: defaults.enabled,
            api_key: None,
            endpoint: defaults.endpoint,
            vehicle_type: defaults.vehicle_type,
            timeout_secs: defaults.timeout_secs,
            warn_debounce_secs: defaults.warn_debounce_secs,
        }
    }
}

impl TollsAppConfig {
    /// Convert to the toll integration config, exposing the key
    #[must_use]
    pub fn to_toll_config(&self) -> TollConfig {
        TollConfig {
            enabled: self.enabled,
            api_key: self.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            endpoint: self.endpoint.clone(),
            vehicle_type: self.vehicle_type.clone(),
            timeout_secs: self.timeout_secs,
            warn_debounce_secs: self.warn_debounce_secs,
        }
    }
}

/// Fare policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Per-kilometre rate for vehicles without their own
    #[serde(default = "default_per_km_rate")]
    pub default_per_km_rate: f64,

    /// Per-minute rate; 0 disables the time fare
    #[serde(default)]
    pub per_minute_rate: f64,

    /// ISO currency code sent with payments
    #[serde(default = "default_currency")]
    pub currency: String,
}

const fn default_per_km_rate() -> f64 {
    domain::DEFAULT_PER_KM_RATE
}

fn default_currency() -> String {
    "usd".to_string()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_per_km_rate: default_per_km_rate(),
            per_minute_rate: 0.0,
            currency: default_currency(),
        }
    }
}

impl PricingConfig {
    /// Build the fare policy
    #[must_use]
    pub fn to_fare_policy(&self) -> FarePolicy {
        let policy = FarePolicy {
            default_per_km_rate: self.default_per_km_rate,
            ..FarePolicy::default()
        };
        if self.per_minute_rate > 0.0 {
            policy.with_per_minute_rate(self.per_minute_rate)
        } else {
            policy
        }
    }
}

/// Invoice/payment backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://localhost:5000`; side effects are skipped when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

const fn default_backend_timeout() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_backend_timeout(),
        }
    }
}

/// SQLite database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Whether to run pending migrations on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_db_path() -> String {
    "chauffeur.db".to_string()
}

const fn default_max_connections() -> u32 {
    4
}

const fn default_true() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// A private in-memory database; one connection so every query sees the same data
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: 1,
            run_migrations: true,
        }
    }

    /// Whether this configuration points at an in-memory database
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryAppConfig {
    /// Log filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for TelemetryAppConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    ///
    /// Environment variables use the `CHAUFFEUR_` prefix and `__` between
    /// nested keys, e.g. `CHAUFFEUR_TOLLS__API_KEY`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or `config.toml`) and environment
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .set_default("pricing.default_per_km_rate", domain::DEFAULT_PER_KM_RATE)?
            .set_default("tolls.vehicle_type", "2AxlesAuto")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("CHAUFFEUR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Effective environment
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let maps = self.to_maps_config();
        maps.validate().map_err(|e| format!("maps: {e}"))?;
        self.tolls
            .to_toll_config()
            .validate()
            .map_err(|e| format!("tolls: {e}"))?;

        if !self.pricing.default_per_km_rate.is_finite() || self.pricing.default_per_km_rate < 0.0 {
            return Err("pricing: default_per_km_rate must be a non-negative number".to_string());
        }
        if self.pricing.per_minute_rate < 0.0 {
            return Err("pricing: per_minute_rate must not be negative".to_string());
        }

        if self.database.path.trim().is_empty() {
            return Err("database: path must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("database: max_connections must be at least 1".to_string());
        }
        if self.database.is_in_memory() && self.database.max_connections > 1 {
            return Err("database: an in-memory database needs max_connections = 1".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for vehicle in &self.vehicles {
            vehicle
                .validate()
                .map_err(|e| format!("vehicles: {} {e}", vehicle.id))?;
            if !seen.insert(vehicle.id.as_str()) {
                return Err(format!("vehicles: duplicate id {}", vehicle.id));
            }
        }

        if self.environment() == Environment::Production && !maps.has_google_key() {
            return Err("maps: google_api_key is required in production".to_string());
        }

        Ok(())
    }

    /// Maps integration config
    #[must_use]
    pub fn to_maps_config(&self) -> MapsConfig {
        self.maps.to_maps_config()
    }
}
