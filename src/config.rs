//! Configuration management
//!
//! Loads settings from a TOML file and `FLYCAST_`-prefixed environment
//! variables, fills in defaults, and validates everything once at startup.

use crate::FlycastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure. Every section is optional in the file;
/// missing values fall back to the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlycastConfig {
    /// Upstream weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Persistent cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream weather API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the Open-Meteo forecast API
    #[serde(default = "default_open_meteo_base_url")]
    pub open_meteo_base_url: String,
    /// Base URL for the MET Norway locationforecast API
    #[serde(default = "default_met_base_url")]
    pub met_base_url: String,
    /// User-Agent sent to MET Norway (their terms require an identifying one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Days of hourly forecast requested from Open-Meteo
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
    /// Merged-forecast cache TTL in minutes
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,
}

/// Persistent cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

impl CacheConfig {
    /// Cache path with a leading `~` expanded to the home directory.
    #[must_use]
    pub fn expanded_location(&self) -> PathBuf {
        if let Some(rest) = self.location.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.location)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Shared secret expected in the Authorization header of the cron
    /// ingestion endpoint. Ingestion is refused while unset.
    #[serde(default)]
    pub cron_secret: Option<String>,
}

// Default value functions
fn default_open_meteo_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_met_base_url() -> String {
    "https://api.met.no/weatherapi/locationforecast/2.0/complete".to_string()
}

fn default_user_agent() -> String {
    format!("flycast/{}", env!("CARGO_PKG_VERSION"))
}

fn default_forecast_days() -> u32 {
    3
}

fn default_cache_ttl_minutes() -> u32 {
    60
}

fn default_cache_location() -> String {
    "~/.cache/flycast".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            open_meteo_base_url: default_open_meteo_base_url(),
            met_base_url: default_met_base_url(),
            user_agent: default_user_agent(),
            forecast_days: default_forecast_days(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            cron_secret: None,
        }
    }
}

impl FlycastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. FLYCAST_SERVER__CRON_SECRET
        builder = builder.add_source(
            Environment::with_prefix("FLYCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: FlycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flycast").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(FlycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for url in [&self.weather.open_meteo_base_url, &self.weather.met_base_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FlycastError::config(format!(
                    "Weather API base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        if self.weather.forecast_days == 0 || self.weather.forecast_days > 16 {
            return Err(
                FlycastError::config("Forecast days must be between 1 and 16").into(),
            );
        }

        if self.weather.cache_ttl_minutes == 0 || self.weather.cache_ttl_minutes > 1440 {
            return Err(FlycastError::config(
                "Forecast cache TTL must be between 1 minute and 24 hours",
            )
            .into());
        }

        if self.weather.user_agent.is_empty() {
            return Err(FlycastError::config(
                "A User-Agent identifying this service is required by MET Norway",
            )
            .into());
        }

        if let Some(secret) = &self.server.cron_secret {
            if secret.len() < 16 {
                return Err(FlycastError::config(
                    "Cron secret must be at least 16 characters",
                )
                .into());
            }
        }

        Ok(())
    }
}
