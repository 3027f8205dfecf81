//! Application settings and configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Production backend
pub const DEFAULT_API_BASE_URL: &str = "https://itprofessionals.dharaniselvaraj.com/itpro/public";

/// Timeout used when none (or zero) is configured
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Application settings
///
/// Stored in JSON format and loaded/saved from disk. Missing fields take
/// their default values, so older files keep loading.
///
/// # Example
/// ```rust,no_run
/// use itpro::storage::Settings;
///
/// // Load settings (returns default if file doesn't exist)
/// let mut settings = Settings::load("settings.json").expect("Failed to load");
///
/// settings.request_timeout_secs = 20;
/// settings.save("settings.json").expect("Failed to save");
///
/// println!("API: {}", settings.api_base_url);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the REST API
    pub api_base_url: String,
    /// Per-request timeout in seconds; 0 means the default
    pub request_timeout_secs: u64,
    /// Location of the session cache file
    pub session_path: String,
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the settings file
    ///
    /// # Returns
    /// The loaded settings, or default settings if file doesn't exist
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Storage(format!("Failed to read settings: {}", e)))?;

        // Handle empty file (return defaults)
        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut settings: Self = serde_json::from_str(&data)
            .map_err(|e| Error::Storage(format!("Failed to parse settings: {}", e)))?;

        if settings.request_timeout_secs == 0 {
            tracing::warn!(
                "request_timeout_secs is 0 in {}, using {}s",
                path.display(),
                DEFAULT_REQUEST_TIMEOUT_SECS
            );
            settings.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
        }

        Ok(settings)
    }

    /// Save settings to a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to save the settings file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create settings directory: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Storage(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, json)
            .map_err(|e| Error::Storage(format!("Failed to write settings: {}", e)))?;

        Ok(())
    }

    /// Request timeout as a `Duration`, never zero
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            session_path: "./data/session.json".to_string(),
        }
    }
}
