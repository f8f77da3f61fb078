use std::fs;
use std::path::{Path, PathBuf};
use log::info;
use serde::{Deserialize, Serialize};
use shared::utils::SESSION_FILE;
use url::Url;
use crate::auth::InspectionPolicy;
use crate::error::ConfigError;

pub const ENV_API_BASE: &str = "SIGCHOS_API_BASE";
pub const DEFAULT_WATCH_INTERVAL_SECS: u64 = 30;

fn default_watch_interval_secs() -> u64 {
    DEFAULT_WATCH_INTERVAL_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub storage_file: Option<String>,
    #[serde(default)]
    pub inspection_policy: InspectionPolicy,
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            storage_file: None,
            inspection_policy: InspectionPolicy::default(),
            watch_interval_secs: DEFAULT_WATCH_INTERVAL_SECS,
            log_level: None,
        }
    }
}

impl AppConfig {
    pub fn from_yaml(content: &str, path: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|err| ConfigError::Parse { path: path.to_string(), reason: err.to_string() })
    }

    /// A missing file yields the defaults.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        match fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content, &display),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("Config file {display} not found, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Read { path: display, reason: err.to_string() }),
        }
    }

    /// Priority: cli argument, environment, config file.
    pub fn resolve_api_base(&self, cli_value: Option<&str>, env_value: Option<&str>) -> Result<String, ConfigError> {
        let url = cli_value
            .or(env_value)
            .or(self.api_base_url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingApiBase)?;
        validate_api_base(url)
    }

    /// Relative storage paths are resolved against the config directory.
    pub fn storage_path(&self, config_dir: &Path) -> PathBuf {
        let file = self.storage_file.as_deref().unwrap_or(SESSION_FILE);
        let path = PathBuf::from(file);
        if path.is_absolute() {
            path
        } else {
            config_dir.join(path)
        }
    }
}

pub fn validate_api_base(url: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(url).map_err(|err| ConfigError::InvalidApiBase { url: url.to_string(), reason: err.to_string() })?;
    match parsed.scheme() {
        "http" | "https" => Ok(url.trim_end_matches('/').to_string()),
        scheme => Err(ConfigError::InvalidApiBase { url: url.to_string(), reason: format!("unsupported scheme {scheme}") }),
    }
}
