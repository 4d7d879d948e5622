//! Runtime settings, optionally loaded from a TOML file

use crate::error::{CbrError, Result};
use crate::types::MissingDayPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default upstream host for the daily CBR archive
pub const CBR_BASE_URL: &str = "https://www.cbr-xml-daily.ru";

/// Settings file structure
///
/// ```toml
/// base_url = "https://www.cbr-xml-daily.ru"
/// timeout_secs = 10
/// max_retries = 1
/// out_dir = "/var/lib/rates"
/// fill = "carry-forward"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a transient fetch failure, 0 or 1
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub fill: MissingDayPolicy,
    /// Honour HTTP(S)_PROXY from the environment
    #[serde(default = "default_use_proxy")]
    pub use_proxy: bool,
}

fn default_base_url() -> String {
    CBR_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    1
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_use_proxy() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            out_dir: default_out_dir(),
            fill: MissingDayPolicy::default(),
            use_proxy: default_use_proxy(),
        }
    }
}

impl Settings {
    /// Load and validate settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CbrError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            CbrError::ConfigError(msg) => {
                CbrError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents)
            .map_err(|e| CbrError::ConfigError(format!("Failed to parse config: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(CbrError::ConfigError(format!(
                "base_url must be an http(s) URL, got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CbrError::ConfigError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_retries > 1 {
            return Err(CbrError::ConfigError(format!(
                "max_retries must be 0 or 1, got: {}",
                self.max_retries
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
