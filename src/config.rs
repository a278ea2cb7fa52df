/// Application configuration
///
/// Read from `config.json` in the user's config directory:
/// - Linux: ~/.config/ultrasound-studio/config.json
/// - macOS: ~/Library/Application Support/ultrasound-studio/config.json
/// - Windows: %APPDATA%\ultrasound-studio\config.json
///
/// Environment variables override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Physical size of one pixel assumed for every scan, in millimetres
pub const DEFAULT_PIXEL_SIZE_MM: f64 = 1.2;

const ENV_BASE_URL: &str = "ULTRASOUND_API_URL";
const ENV_PIXEL_SIZE: &str = "ULTRASOUND_PIXEL_SIZE_MM";
const ENV_TIMEOUT: &str = "ULTRASOUND_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid service URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("Pixel size must be a positive number of millimetres, got {0}")]
    InvalidPixelSize(f64),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Scheme, host and port of the image-processing service
    pub base_url: String,
    pub pixel_size_mm: f64,
    /// `None` waits as long as the network layer does
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pixel_size_mm: DEFAULT_PIXEL_SIZE_MM,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load from the default location plus environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Where the config file is expected, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("ultrasound-studio");
        path.push("config.json");
        Some(path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply overrides from `lookup` (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(value) = lookup(ENV_PIXEL_SIZE) {
            self.pixel_size_mm = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_PIXEL_SIZE,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT) {
            let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT,
                value: value.clone(),
            })?;
            // 0 means no timeout
            self.request_timeout_secs = (secs > 0).then_some(secs);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidUrl(self.base_url.clone(), e))?;
        if !self.pixel_size_mm.is_finite() || self.pixel_size_mm <= 0.0 {
            return Err(ConfigError::InvalidPixelSize(self.pixel_size_mm));
        }
        Ok(())
    }

    /// A timeout of 0 seconds, from the file or the environment, means none
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
