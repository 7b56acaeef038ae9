//! Configuration management for the PackAndGo backend
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. Secrets
//! (provider credentials, SMTP password) are read from the environment
//! only and never land in a config file.

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the PackAndGo backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackAndGoConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Amadeus provider settings
    #[serde(default)]
    pub amadeus: AmadeusConfig,
    /// API Ninjas airport-lookup settings
    #[serde(default)]
    pub airports: AirportsConfig,
    /// Confirmation email settings
    #[serde(default)]
    pub email: EmailConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the API listens on
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Amadeus provider settings. Credentials come from
/// `PACKANDGO_AMADEUS__CLIENT_ID` / `PACKANDGO_AMADEUS__CLIENT_SECRET`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmadeusConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Base URL (test or production environment)
    #[serde(default = "default_amadeus_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
}

/// API Ninjas settings. The key comes from `PACKANDGO_AIRPORTS__API_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportsConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_airports_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u64,
}

/// Confirmation email settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host
    #[serde(default = "default_smtp_relay")]
    pub smtp_relay: String,
    /// Display name on outgoing mail
    #[serde(default = "default_from_name")]
    pub from_name: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_server_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_amadeus_base_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_airports_base_url() -> String {
    "https://api.api-ninjas.com".to_string()
}

fn default_provider_timeout() -> u64 {
    10
}

fn default_smtp_relay() -> String {
    "smtp.gmail.com".to_string()
}

fn default_from_name() -> String {
    "PackAndGo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            base_url: default_amadeus_base_url(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl Default for AirportsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_airports_base_url(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_relay: default_smtp_relay(),
            from_name: default_from_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for PackAndGoConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            amadeus: AmadeusConfig::default(),
            airports: AirportsConfig::default(),
            email: EmailConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl PackAndGoConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // Add environment variable overrides with PACKANDGO_ prefix,
        // section and key separated by a double underscore
        // (PACKANDGO_AMADEUS__CLIENT_ID -> amadeus.client_id)
        builder = builder.add_source(
            Environment::with_prefix("PACKANDGO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: PackAndGoConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("packandgo").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.request_timeout_seconds == 0 || self.server.request_timeout_seconds > 300 {
            return Err(anyhow!(
                "Server request timeout must be between 1 and 300 seconds"
            ));
        }

        if self.amadeus.timeout_seconds == 0 || self.amadeus.timeout_seconds > 120 {
            return Err(anyhow!(
                "Amadeus timeout must be between 1 and 120 seconds"
            ));
        }

        if self.airports.timeout_seconds == 0 || self.airports.timeout_seconds > 120 {
            return Err(anyhow!(
                "Airport lookup timeout must be between 1 and 120 seconds"
            ));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ));
        }

        for (name, url) in [
            ("Amadeus", &self.amadeus.base_url),
            ("airport lookup", &self.airports.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow!(
                    "{} base URL must be a valid HTTP or HTTPS URL",
                    name
                ));
            }
        }

        if self.email.smtp_relay.trim().is_empty() {
            return Err(anyhow!("SMTP relay cannot be empty"));
        }

        Ok(())
    }

    /// Create configuration directory if it doesn't exist
    pub fn ensure_config_dir() -> Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let packandgo_config_dir = config_dir.join("packandgo");
            std::fs::create_dir_all(&packandgo_config_dir).with_context(|| {
                format!(
                    "Failed to create config directory: {}",
                    packandgo_config_dir.display()
                )
            })?;
            Ok(packandgo_config_dir)
        } else {
            Err(anyhow!("Unable to determine config directory"))
        }
    }
}
