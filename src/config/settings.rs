//! Application settings loading from config.toml
//!
//! Every section is optional: a missing file or a missing key falls back to
//! the defaults below. `DATABASE_URL` in the environment wins over the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Percentage applied when the employee leaves the VAT percentage blank.
pub const DEFAULT_PCT: i32 = 20;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Where bills and receipts live
    pub store: StoreConfig,
    /// New-bill form policy
    pub form: FormConfig,
}

/// Where bills and receipts live
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// SeaORM connection string
    pub database_url: String,
    /// Prefix of the `fileUrl` handed out for uploaded receipts
    pub receipt_base_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://billed.sqlite?mode=rwc".to_string(),
            receipt_base_url: "/receipts".to_string(),
        }
    }
}

/// New-bill form policy
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FormConfig {
    /// Value used for `pct` when the field is left blank
    pub default_pct: i32,
    /// Minimum bill name length; no rule when absent
    pub min_name_length: Option<usize>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_pct: DEFAULT_PCT,
            min_name_length: None,
        }
    }
}

impl FormConfig {
    /// Checks the policy against the rules typed input is held to.
    ///
    /// # Errors
    /// Returns `Error::Config` when `default_pct` is outside `0..=100`.
    pub fn validate(&self) -> Result<()> {
        if !(0..=100).contains(&self.default_pct) {
            return Err(Error::Config {
                message: format!(
                    "form.default_pct must be between 0 and 100, got {}",
                    self.default_pct
                ),
            });
        }
        Ok(())
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Loading configuration from {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses settings from TOML text
///
/// # Errors
/// Returns `Error::Config` if the TOML is invalid or a value is out of range.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.form.validate()?;
    Ok(config)
}

/// Resolves the configuration used by the binary.
///
/// Reads the file named by `BILLED_CONFIG` (default `config.toml`), keeps the
/// defaults when that file does not exist, then applies `DATABASE_URL`.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("BILLED_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        info!("No configuration file at {path}, using defaults");
        AppConfig::default()
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        debug!("DATABASE_URL overrides configured database url");
        config.store.database_url = url;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [store]
            database_url = "sqlite::memory:"
            receipt_base_url = "https://files.billed.test"

            [form]
            default_pct = 10
            min_name_length = 5
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.store.database_url, "sqlite::memory:");
        assert_eq!(config.store.receipt_base_url, "https://files.billed.test");
        assert_eq!(config.form.default_pct, 10);
        assert_eq!(config.form.min_name_length, Some(5));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.form.default_pct, DEFAULT_PCT);
        assert!(config.form.min_name_length.is_none());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let result = parse_config("[form\ndefault_pct = ");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_out_of_range_default_pct_is_rejected() {
        for pct in [-1, 101, 500] {
            let result = parse_config(&format!("[form]\ndefault_pct = {pct}"));
            match result {
                Err(Error::Config { message }) => assert!(message.contains("default_pct")),
                other => panic!("expected a config error for {pct}, got {other:?}"),
            }
        }
        assert!(parse_config("[form]\ndefault_pct = 0").is_ok());
        assert!(parse_config("[form]\ndefault_pct = 100").is_ok());
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let result = load_config("definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
