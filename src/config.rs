//! Configuration file support for findings-reconciler.
//!
//! Provides YAML-based configuration through `reconciler.config.yml`
//! files, including data structures, file loading, validation, and the
//! merge of file values with command-line overrides.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;

use crate::adapters::outbound::network::RetryPolicy;
use crate::logging::LogFormat;
use crate::shared::error::ReconcileError;
use crate::shared::Result;

const CONFIG_FILENAME: &str = "reconciler.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Base URL of the scanning service.
    pub scanner_url: Option<String>,
    /// Base URL of the findings aggregator.
    pub aggregator_url: Option<String>,
    /// Bearer token attached to every request to both services.
    pub auth_token: Option<String>,
    /// Retry budget for transient service failures.
    pub max_retries: Option<u32>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub scanner_url: Option<String>,
    pub aggregator_url: Option<String>,
    pub dry_run: bool,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Fully resolved settings: overrides > config file > defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub scanner_url: String,
    pub aggregator_url: String,
    pub auth_token: Option<String>,
    pub max_retries: u32,
    pub dry_run: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn resolve(overrides: Overrides, file: ConfigFile) -> Result<Settings> {
        let scanner_url = overrides
            .scanner_url
            .or(file.scanner_url)
            .ok_or(ReconcileError::MissingSetting {
                name: "scanning service endpoint",
                config_key: "scanner_url",
                flag: "--scanner-url",
            })?;
        let aggregator_url =
            overrides
                .aggregator_url
                .or(file.aggregator_url)
                .ok_or(ReconcileError::MissingSetting {
                    name: "findings aggregator endpoint",
                    config_key: "aggregator_url",
                    flag: "--aggregator-url",
                })?;

        let log_format = match overrides.log_format {
            Some(format) => format,
            None => file
                .log_format
                .as_deref()
                .map(LogFormat::from_str)
                .transpose()
                .map_err(|e| anyhow!(e))?
                .unwrap_or(LogFormat::Text),
        };

        Ok(Settings {
            scanner_url,
            aggregator_url,
            auth_token: file.auth_token,
            max_retries: file
                .max_retries
                .unwrap_or(RetryPolicy::DEFAULT_MAX_ATTEMPTS),
            dry_run: overrides.dry_run,
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    for (key, url) in [
        ("scanner_url", &config.scanner_url),
        ("aggregator_url", &config.aggregator_url),
    ] {
        if let Some(url) = url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!(
                    "Invalid config: {} must be an http(s) URL, got '{}'.\n\n\
                     💡 Hint: Endpoints are base URLs such as \"https://scanner.internal.example\".",
                    key,
                    url
                );
            }
        }
    }

    if config.max_retries == Some(0) {
        bail!(
            "Invalid config: max_retries must be at least 1.\n\n\
             💡 Hint: The first attempt counts; max_retries: 1 disables retrying."
        );
    }

    if let Some(ref format) = config.log_format {
        LogFormat::from_str(format).map_err(|e| anyhow!("Invalid config: {}", e))?;
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
///
/// Logging is not initialized yet when config loads, so this goes
/// straight to stderr.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
