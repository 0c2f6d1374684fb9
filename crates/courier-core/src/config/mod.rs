//! Application configuration with layered loading.
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by the `COURIER_CONFIG` env var
//! 3. **Environment variables**: `COURIER__SECTION__FIELD` overrides
//!
//! All values are immutable for the lifetime of the process. Invalid
//! configurations (empty signing secrets, zero token lifetimes, zero burst)
//! are rejected at load time rather than failing later at request time.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// HTTP server configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind the server to. Defaults to `127.0.0.1`.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port number to listen on. Defaults to `8080`.
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Request timeout in seconds. Defaults to `30`.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_request_timeout_seconds() -> u64 {
    30
}

/// Per-client rate limiting configuration.
///
/// One token bucket per client key, shared settings for all keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Sustained admission rate in tokens per second. Defaults to `5`.
    #[serde(default = "default_refill_rate")]
    pub refill_rate: f64,

    /// Maximum burst size (bucket capacity). Defaults to `10`.
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Seconds after bucket creation before it is evicted. Defaults to `600`.
    #[serde(default = "default_idle_eviction_seconds")]
    pub idle_eviction_seconds: u64,
}

fn default_refill_rate() -> f64 {
    5.0
}

fn default_burst() -> u32 {
    10
}

fn default_idle_eviction_seconds() -> u64 {
    600
}

impl RateLimitConfig {
    #[must_use]
    pub fn idle_eviction(&self) -> Duration {
        Duration::from_secs(self.idle_eviction_seconds)
    }
}

/// JWT authentication configuration.
///
/// Access and refresh tokens are signed with independent secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    #[serde(default = "default_access_secret")]
    pub access_secret: String,

    /// HMAC secret for refresh tokens.
    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,

    /// Access token lifetime in seconds. Defaults to `900` (15 minutes).
    #[serde(default = "default_access_ttl_seconds")]
    pub access_ttl_seconds: u64,

    /// Refresh token lifetime in seconds. Defaults to `604800` (7 days).
    #[serde(default = "default_refresh_ttl_seconds")]
    pub refresh_ttl_seconds: u64,
}

fn default_access_secret() -> String {
    "dev-access-secret".to_string()
}

fn default_refresh_secret() -> String {
    "dev-refresh-secret".to_string()
}

fn default_access_ttl_seconds() -> u64 {
    900
}

fn default_refresh_ttl_seconds() -> u64 {
    604_800
}

impl AuthConfig {
    #[must_use]
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_seconds)
    }

    #[must_use]
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_seconds)
    }
}

/// Application logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g. "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Outbound mapping/geocoding client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Whether the maps client is enabled. Defaults to `false`.
    #[serde(default)]
    pub enabled: bool,

    /// API key for the mapping provider.
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the mapping provider.
    #[serde(default = "default_maps_base_url")]
    pub base_url: String,
}

fn default_maps_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

/// Root application configuration containing all subsystem settings.
///
/// Environment overrides use the `COURIER` prefix with `__` as a separator,
/// e.g. `COURIER__SERVER__BIND_PORT=9090` or
/// `COURIER__AUTH__ACCESS_SECRET=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment (e.g. "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub maps: MapsConfig,
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            refill_rate: default_refill_rate(),
            burst: default_burst(),
            idle_eviction_seconds: default_idle_eviction_seconds(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            access_ttl_seconds: default_access_ttl_seconds(),
            refresh_ttl_seconds: default_refresh_ttl_seconds(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: default_log_format() }
    }
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self { enabled: false, api_key: String::new(), base_url: default_maps_base_url() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
            maps: MapsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or
    /// deserialized, or if validation fails.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("COURIER").separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `config/config.toml` with fallback to defaults.
    ///
    /// The config file path can be overridden via the `COURIER_CONFIG`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("COURIER_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Validates cross-field constraints that serde defaults cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Message`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.access_secret.is_empty() {
            return Err(ConfigError::Message("auth.access_secret must not be empty".to_string()));
        }
        if self.auth.refresh_secret.is_empty() {
            return Err(ConfigError::Message("auth.refresh_secret must not be empty".to_string()));
        }
        if self.environment == "production" && self.auth.access_secret.starts_with("dev-") {
            return Err(ConfigError::Message(
                "auth.access_secret must be overridden in production".to_string(),
            ));
        }
        if self.auth.access_ttl_seconds == 0 || self.auth.refresh_ttl_seconds == 0 {
            return Err(ConfigError::Message("auth token lifetimes must be non-zero".to_string()));
        }
        if self.rate_limit.refill_rate <= 0.0 {
            return Err(ConfigError::Message(
                "rate_limit.refill_rate must be greater than zero".to_string(),
            ));
        }
        if self.rate_limit.burst == 0 {
            return Err(ConfigError::Message(
                "rate_limit.burst must be at least 1".to_string(),
            ));
        }
        if self.maps.enabled && self.maps.api_key.is_empty() {
            return Err(ConfigError::Message(
                "maps.api_key must be set when maps.enabled is true".to_string(),
            ));
        }
        Ok(())
    }
}
