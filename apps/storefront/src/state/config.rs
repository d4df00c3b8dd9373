//! # Configuration State
//!
//! Storefront configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`PHARMACY_*`)
//! 2. Config file (`storefront.toml` in the platform config dir, or `PHARMACY_CONFIG`)
//! 3. Defaults (this file)
//!
//! Read-only after initialization, so no mutex.

use directories::ProjectDirs;
use pharmacy_core::Money;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Name of the config file inside the platform config dir.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Name of the local storage file inside the platform data dir.
pub const STORAGE_FILE_NAME: &str = "storefront.db";

/// Storefront configuration.
///
/// ## Example `storefront.toml`
/// ```toml
/// api_url = "https://pharmacy.example.com"
/// debounce_ms = 250
/// currency_symbol = "€"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Base URL of the REST backend.
    pub api_url: String,

    /// Local storage file. `None` uses the platform data dir.
    pub storage_path: Option<PathBuf>,

    /// Search suggestion debounce delay in milliseconds.
    pub debounce_ms: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Where downloaded invoices go. `None` uses the current directory.
    pub download_dir: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            api_url: "http://localhost:5000".to_string(),
            storage_path: None,
            debounce_ms: 300,
            request_timeout_secs: 30,
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            download_dir: None,
        }
    }
}

impl StorefrontConfig {
    /// Loads defaults, then the config file, then environment overrides.
    ///
    /// A missing config file is fine; an unreadable or malformed one is an
    /// error.
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("PHARMACY_CONFIG")
            .ok()
            .map(PathBuf::from)
            .or_else(|| project_dirs().map(|d| d.config_dir().join(CONFIG_FILE_NAME)));

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(path = %path.display(), "No config file, using defaults");
                StorefrontConfig::default()
            }
            None => StorefrontConfig::default(),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Reads a TOML config file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Could not read {}: {e}", path.display())))?;
        let config: StorefrontConfig = toml::from_str(&text).map_err(|e: toml::de::Error| {
            AppError::config(format!("{}: {}", path.display(), e.message()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML text; unspecified keys keep their defaults.
    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        let config: StorefrontConfig =
            toml::from_str(text).map_err(|e| AppError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the client cannot run with.
    ///
    /// A zero request timeout would fail every call before it is sent.
    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(AppError::config("request_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Applies `PHARMACY_*` overrides using `lookup` to read variables.
    ///
    /// Unparseable numbers are ignored with a warning. A parseable value
    /// that fails [`validate`](Self::validate) is an error.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(url) = lookup("PHARMACY_API_URL") {
            self.api_url = url;
        }

        if let Some(path) = lookup("PHARMACY_STORAGE_PATH") {
            self.storage_path = Some(PathBuf::from(path));
        }

        if let Some(value) = lookup("PHARMACY_DEBOUNCE_MS") {
            match value.parse() {
                Ok(ms) => self.debounce_ms = ms,
                Err(_) => warn!(value = %value, "Ignoring invalid PHARMACY_DEBOUNCE_MS"),
            }
        }

        if let Some(value) = lookup("PHARMACY_REQUEST_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => warn!(value = %value, "Ignoring invalid PHARMACY_REQUEST_TIMEOUT_SECS"),
            }
        }

        self.validate()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The local storage file, falling back to the platform data dir.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.pharmacy.storefront/storefront.db`
    /// - **Windows**: `%APPDATA%\pharmacy\storefront\data\storefront.db`
    /// - **Linux**: `~/.local/share/storefront/storefront.db`
    pub fn resolve_storage_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.storage_path {
            return Ok(path.clone());
        }
        let dirs = project_dirs()
            .ok_or_else(|| AppError::config("Could not determine app data directory"))?;
        Ok(dirs.data_dir().join(STORAGE_FILE_NAME))
    }

    /// Directory invoices are written to.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Formats an amount with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust
    /// use pharmacy_core::Money;
    /// use pharmacy_storefront::state::StorefrontConfig;
    ///
    /// let config = StorefrontConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(11700)), "$117.00");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        // Money is always in cents; fewer decimals truncate, more pad with zeros
        let sign = if cents < 0 { "-" } else { "" };
        let whole = (cents / 100).abs();
        let frac = (cents % 100).abs();

        let frac = match self.currency_decimals {
            0 => String::new(),
            1 => format!(".{}", frac / 10),
            2 => format!(".{frac:02}"),
            n => format!(".{frac:02}{}", "0".repeat(n as usize - 2)),
        };

        format!("{sign}{}{whole}{frac}", self.currency_symbol)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "pharmacy", "storefront")
}
