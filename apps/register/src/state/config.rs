//! # Register Configuration
//!
//! Loaded once at startup; read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     REGISTER_API_ENDPOINT=https://api.example.com                       │
//! │     REGISTER_API_TIMEOUT_SECS=10                                        │
//! │     REGISTER_LOCALE=ja                                                  │
//! │     REGISTER_TAX_RATE_BPS=1000                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/register/register.toml (Linux)                            │
//! │     ~/Library/Application Support/jp.popup-store.register/register.toml │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     no endpoint, ja, 10% tax, rear camera 1280×720                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # register.toml
//! [api]
//! endpoint = "https://api.example.com"
//! timeout_secs = 10
//!
//! [store]
//! name = "POP-UP STORE"
//! locale = "ja"
//! tax_rate_bps = 1000
//!
//! [scanner]
//! facing_mode = "environment"
//! ideal_width = 1280
//! ideal_height = 720
//! event_buffer = 16
//! ```

use std::path::{Path, PathBuf};

use register_api::{ApiConfig, ApiError};
use register_core::{TaxRate, STANDARD_TAX_RATE_BPS};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::camera::{FacingMode, StreamConstraints};
use crate::messages::Locale;

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "register.toml";

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid API settings: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Whole-register configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,
}

/// Store-wide display and pricing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Store name shown in the title bar.
    pub name: String,

    pub locale: Locale,

    /// Consumption tax in basis points (1000 = 10%).
    pub tax_rate_bps: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "POP-UP STORE".to_string(),
            locale: Locale::Ja,
            tax_rate_bps: STANDARD_TAX_RATE_BPS,
        }
    }
}

impl StoreSettings {
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

/// Scanner camera settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    pub facing_mode: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,

    /// Capacity of the decode event channel.
    pub event_buffer: usize,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        let constraints = StreamConstraints::default();
        ScannerSettings {
            facing_mode: constraints.facing_mode,
            ideal_width: constraints.ideal_width,
            ideal_height: constraints.ideal_height,
            event_buffer: 16,
        }
    }
}

impl ScannerSettings {
    pub fn constraints(&self) -> StreamConstraints {
        StreamConstraints {
            facing_mode: self.facing_mode,
            ideal_width: self.ideal_width,
            ideal_height: self.ideal_height,
        }
    }
}

impl RegisterConfig {
    /// Loads configuration: defaults, then the file, then the environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading register config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file with no environment overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        self.api.validate()?;

        if self.store.tax_rate_bps > 10_000 {
            return Err(ConfigError::Invalid(format!(
                "tax_rate_bps must be at most 10000, got: {}",
                self.store.tax_rate_bps
            )));
        }
        if self.scanner.ideal_width == 0 || self.scanner.ideal_height == 0 {
            return Err(ConfigError::Invalid(
                "scanner resolution must be non-zero".into(),
            ));
        }
        if self.scanner.event_buffer == 0 {
            return Err(ConfigError::Invalid(
                "scanner event_buffer must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Applies `REGISTER_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("REGISTER_API_ENDPOINT") {
            debug!(endpoint = %endpoint, "Overriding API endpoint from environment");
            self.api.endpoint = Some(endpoint);
        }

        if let Some(secs) = lookup("REGISTER_API_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric REGISTER_API_TIMEOUT_SECS"),
            }
        }

        if let Some(locale) = lookup("REGISTER_LOCALE") {
            match locale.parse() {
                Ok(parsed) => self.store.locale = parsed,
                Err(e) => warn!(error = %e, "Ignoring REGISTER_LOCALE"),
            }
        }

        if let Some(bps) = lookup("REGISTER_TAX_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(b) => {
                    debug!(bps = b, "Overriding tax rate from environment");
                    self.store.tax_rate_bps = b;
                }
                Err(_) => warn!(value = %bps, "Ignoring non-numeric REGISTER_TAX_RATE_BPS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("jp", "popup-store", "register")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RegisterConfig::default();
        assert_eq!(config.api.endpoint, None);
        assert_eq!(config.store.locale, Locale::Ja);
        assert_eq!(config.store.tax_rate(), TaxRate::standard());
        assert_eq!(config.scanner.constraints(), StreamConstraints::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[api]
endpoint = "http://localhost:8000"

[store]
locale = "en"

[scanner]
ideal_width = 640
ideal_height = 480
"#
        )
        .unwrap();

        let config = RegisterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.endpoint.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.store.locale, Locale::En);
        assert_eq!(config.store.name, "POP-UP STORE");
        assert_eq!(config.scanner.ideal_width, 640);
        assert_eq!(config.scanner.facing_mode, FacingMode::Environment);
        assert_eq!(config.scanner.event_buffer, 16);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");

        assert!(matches!(
            RegisterConfig::from_file(&absent),
            Err(ConfigError::Io(_))
        ));

        // load() treats a missing file as "use defaults"
        let config = RegisterConfig::load(Some(absent)).unwrap();
        assert_eq!(config.scanner, ScannerSettings::default());
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store\nlocale = ").unwrap();
        assert!(matches!(
            RegisterConfig::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RegisterConfig::default();
        config.apply_overrides(lookup(&[
            ("REGISTER_API_ENDPOINT", "https://api.example.com"),
            ("REGISTER_API_TIMEOUT_SECS", "3"),
            ("REGISTER_LOCALE", "en"),
            ("REGISTER_TAX_RATE_BPS", "800"),
        ]));

        assert_eq!(config.api.endpoint.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.store.locale, Locale::En);
        assert_eq!(config.store.tax_rate_bps, 800);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = RegisterConfig::default();
        config.apply_overrides(lookup(&[
            ("REGISTER_LOCALE", "klingon"),
            ("REGISTER_TAX_RATE_BPS", "ten percent"),
        ]));

        assert_eq!(config.store.locale, Locale::Ja);
        assert_eq!(config.store.tax_rate_bps, STANDARD_TAX_RATE_BPS);
    }

    #[test]
    fn test_validate() {
        let mut config = RegisterConfig::default();
        config.store.tax_rate_bps = 20_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = RegisterConfig::default();
        config.api = ApiConfig::with_endpoint("ftp://nope");
        assert!(matches!(config.validate(), Err(ConfigError::Api(_))));

        let mut config = RegisterConfig::default();
        config.scanner.event_buffer = 0;
        assert!(config.validate().is_err());
    }
}
