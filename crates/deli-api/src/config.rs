//! # Console Configuration
//!
//! Where the backend lives and how the screens behave.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DELI_API_URL=http://10.0.0.5:4000/api                              │
//! │     DELI_API_TIMEOUT_SECS=5                                            │
//! │     DELI_RELOAD_LINES_ON_EDIT=true                                     │
//! │     DELI_FORECAST_HORIZON=2                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or the platform config dir:                       │
//! │     ~/.config/deli-console/deli-console.toml (Linux)                   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:4000/api, 10s timeout                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:4000/api"
//! timeout_secs = 10
//!
//! [sales]
//! reload_lines_on_edit = false
//!
//! [forecast]
//! horizon = 1
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use deli_core::EditPolicy;

use crate::error::{ApiError, ApiResult};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "deli-console.toml";

// =============================================================================
// Sections
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root of the REST API; resources hang off it (`{base_url}/clientes`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:4000/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sales screen behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSettings {
    /// Refill the pending lines from the stored `detalles` when a sale is
    /// opened for edit. Off by default: edit starts with no lines.
    #[serde(default)]
    pub reload_lines_on_edit: bool,
}

/// Dashboard forecast settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// Months past the last data point to project.
    #[serde(default = "default_horizon")]
    pub horizon: u32,
}

fn default_horizon() -> u32 {
    1
}

impl Default for ForecastSettings {
    fn default() -> Self {
        ForecastSettings {
            horizon: default_horizon(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete console configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub sales: SalesSettings,

    #[serde(default)]
    pub forecast: ForecastSettings,
}

impl ConsoleConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (an explicit path must exist; the platform path may not)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                info!(?path, "Loading console config from file");
                Self::from_toml(&std::fs::read_to_string(&path)?)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(?path, "Loading console config from file");
                    Self::from_toml(&std::fs::read_to_string(&path)?)?
                }
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> ApiResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let url = url::Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ApiError::InvalidConfig(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.forecast.horizon == 0 {
            return Err(ApiError::InvalidConfig(
                "forecast horizon must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DELI_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = lookup("DELI_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric DELI_API_TIMEOUT_SECS"),
            }
        }

        if let Some(flag) = lookup("DELI_RELOAD_LINES_ON_EDIT") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.sales.reload_lines_on_edit = true,
                "0" | "false" | "no" | "off" => self.sales.reload_lines_on_edit = false,
                _ => warn!(value = %flag, "Unknown DELI_RELOAD_LINES_ON_EDIT value"),
            }
        }

        if let Some(horizon) = lookup("DELI_FORECAST_HORIZON") {
            match horizon.parse::<u32>() {
                Ok(h) => self.forecast.horizon = h,
                Err(_) => warn!(value = %horizon, "Ignoring non-numeric DELI_FORECAST_HORIZON"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("pe", "fiambreria", "deli-console")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// How records are turned back into form state.
    pub fn edit_policy(&self) -> EditPolicy {
        EditPolicy {
            reload_sale_lines: self.sales.reload_lines_on_edit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:4000/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert!(!config.sales.reload_lines_on_edit);
        assert_eq!(config.forecast.horizon, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ConsoleConfig::from_toml(
            r#"
            [sales]
            reload_lines_on_edit = true
            "#,
        )
        .unwrap();
        assert!(config.sales.reload_lines_on_edit);
        assert!(config.edit_policy().reload_sale_lines);
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn test_bad_toml_is_a_load_error() {
        let err = ConsoleConfig::from_toml("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ApiError::ConfigLoad(_)));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ConsoleConfig::default();

        config.api.base_url = "ftp://files.local".to_string();
        assert!(matches!(config.validate(), Err(ApiError::InvalidConfig(_))));

        config.api.base_url = "localhost:4000".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://deli.example.pe/api".to_string();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 5;
        config.forecast.horizon = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("DELI_API_URL", "http://10.0.0.5:4000/api"),
            ("DELI_API_TIMEOUT_SECS", "3"),
            ("DELI_RELOAD_LINES_ON_EDIT", "TRUE"),
            ("DELI_FORECAST_HORIZON", "nope"),
        ]
        .into_iter()
        .collect();

        let mut config = ConsoleConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.5:4000/api");
        assert_eq!(config.api.timeout_secs, 3);
        assert!(config.sales.reload_lines_on_edit);
        assert_eq!(config.forecast.horizon, 1);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = ConsoleConfig::load(Some(PathBuf::from("/nonexistent/deli.toml"))).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&ConsoleConfig::default()).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[forecast]"));
    }
}
