//! Configuration for the CNC link gateway.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::focas::default_library_path;
use crate::link::LinkSettings;

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub focas: FocasConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Native library and connection defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct FocasConfig {
    /// Path of the vendor shared library. Loaded on the first driver call.
    #[serde(default = "default_library")]
    pub library_path: String,
    /// Port used when a connect request does not name one.
    #[serde(default = "default_focas_port")]
    pub default_port: u16,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: i32,
    /// Number of axes returned by bulk reads (1-8).
    #[serde(default = "default_axis_count")]
    pub axis_count: usize,
}

impl Default for FocasConfig {
    fn default() -> Self {
        Self {
            library_path: default_library(),
            default_port: default_focas_port(),
            connect_timeout_secs: default_connect_timeout(),
            axis_count: default_axis_count(),
        }
    }
}

impl FocasConfig {
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            axis_count: crate::focas::layout::clamp_axis_count(self.axis_count),
            connect_timeout_secs: self.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5999
}
fn default_library() -> String {
    default_library_path().to_string()
}
fn default_focas_port() -> u16 {
    cnc_link_common::DEFAULT_FOCAS_PORT
}
fn default_connect_timeout() -> i32 {
    10
}
fn default_axis_count() -> usize {
    crate::focas::layout::MAX_AXIS
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `config.toml` and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (CNCLINK__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Same as [`Config::load`] with an explicit file name (extension optional).
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .set_default("api.host", default_host())?
            .set_default("api.port", default_port() as i64)?
            .set_default("focas.library_path", default_library())?
            .set_default("focas.default_port", default_focas_port() as i64)?
            .set_default("focas.connect_timeout_secs", default_connect_timeout() as i64)?
            .set_default("focas.axis_count", default_axis_count() as i64)?
            .set_default("logging.level", default_log_level())?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("CNCLINK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_api_config() {
        let api = ApiConfig::default();
        assert_eq!(api.host, "0.0.0.0");
        assert_eq!(api.port, 5999);
    }

    #[test]
    fn test_default_focas_config() {
        let focas = FocasConfig::default();
        assert_eq!(focas.default_port, 8193);
        assert_eq!(focas.connect_timeout_secs, 10);
        assert_eq!(focas.axis_count, 8);
        assert_eq!(focas.library_path, default_library_path());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load_from("/nonexistent/cnc-link-config").unwrap();
        assert_eq!(config.api.port, 5999);
        assert_eq!(config.focas.axis_count, 8);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[api]
port = 6001

[focas]
library_path = "/opt/fanuc/libfwlib32.so"
axis_count = 4
"#
        )
        .unwrap();

        let config = Config::load_from(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.api.port, 6001);
        assert_eq!(config.focas.library_path, "/opt/fanuc/libfwlib32.so");
        assert_eq!(config.focas.axis_count, 4);
        assert_eq!(config.focas.default_port, 8193);
    }

    #[test]
    fn test_link_settings_clamp_axis_count() {
        let focas = FocasConfig {
            axis_count: 32,
            ..FocasConfig::default()
        };
        assert_eq!(focas.link_settings().axis_count, 8);

        let focas = FocasConfig {
            axis_count: 0,
            ..FocasConfig::default()
        };
        assert_eq!(focas.link_settings().axis_count, 1);
    }
}
