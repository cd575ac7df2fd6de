//! Configuration file handling.
//!
//! This module provides loading and saving of corsprobe defaults from a
//! TOML file. Command-line flags always take precedence over file values.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/corsprobe/config.toml`
//! - macOS: `~/Library/Application Support/corsprobe/config.toml`
//! - Windows: `%APPDATA%\corsprobe\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! method = "GET"
//! concurrency = 5
//! timeout_secs = 10
//! user_agent = "corsprobe/1.0.0"
//! output = "cors_results.txt"
//! format = "text"
//!
//! [headers]
//! Authorization = "Bearer example-token"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ScanError;
use crate::model::{
    ScanConfig, DEFAULT_CONCURRENCY, DEFAULT_METHOD, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

/// Report file written when no `--output` flag is given.
pub const DEFAULT_OUTPUT: &str = "cors_results.txt";

/// Application configuration.
///
/// This struct represents all configurable options for corsprobe.
/// It can be loaded from a TOML file or created with default values.
///
/// # Example
///
/// ```no_run
/// use corsprobe::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Concurrency: {}", config.concurrency);
/// println!("Timeout: {}s", config.timeout_secs);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP method used for every probe.
    ///
    /// Default: "GET"
    pub method: String,

    /// Maximum number of requests in flight at once.
    ///
    /// Default: 5
    pub concurrency: usize,

    /// Per-request timeout, in seconds. 0 disables the timeout.
    ///
    /// Default: 10
    pub timeout_secs: u64,

    /// User-Agent header sent with every probe.
    pub user_agent: String,

    /// Report file path.
    ///
    /// Default: "cors_results.txt"
    pub output: PathBuf,

    /// Report format when no `--format` flag is provided.
    ///
    /// Valid values: "text", "json"
    /// Default: "text"
    pub format: String,

    /// Extra headers added to every probe.
    pub headers: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: "text".to_string(),
            headers: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`, falling back to defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use corsprobe::Config;
    ///
    /// let path = Config::config_path();
    /// println!("Config file: {}", path.display());
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("corsprobe")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Builds the immutable request settings for a scan.
    ///
    /// The configured User-Agent is added to the fixed headers unless a
    /// `User-Agent` entry is already present in `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidConcurrency`] if `concurrency` is zero.
    pub fn to_scan_config(&self) -> std::result::Result<ScanConfig, ScanError> {
        let mut headers = self.headers.clone();
        let has_user_agent = headers
            .keys()
            .any(|name| name.eq_ignore_ascii_case("user-agent"));
        if !has_user_agent && !self.user_agent.is_empty() {
            headers.insert("User-Agent".to_string(), self.user_agent.clone());
        }

        let config = ScanConfig {
            method: self.method.to_uppercase(),
            headers,
            timeout: Duration::from_secs(self.timeout_secs),
            concurrency: self.concurrency,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parses a `Name: Value` header argument.
///
/// # Example
///
/// ```
/// use corsprobe::config::parse_header_arg;
///
/// let (name, value) = parse_header_arg("X-Api-Key: secret").unwrap();
/// assert_eq!(name, "X-Api-Key");
/// assert_eq!(value, "secret");
/// ```
pub fn parse_header_arg(raw: &str) -> std::result::Result<(String, String), ScanError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| ScanError::InvalidHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ScanError::InvalidHeader(raw.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
