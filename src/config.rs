//! Page configuration: `config.yaml`, then `.env`, then process environment.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_ENV_VAR: &str = "PODCAST_SHELF_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host serving the API; endpoint paths are resolved against it.
    pub origin: String,
    pub data_source: String,
    pub status_endpoint: String,
    /// Base for remote audio/transcript paths.
    pub base_url: String,
    pub episodes_per_page: usize,
    pub refresh_interval_secs: u64,
    pub status_poll_secs: u64,
    pub search_debounce_ms: u64,
    pub modal_reveal_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8080".to_string(),
            data_source: "/api/podcasts".to_string(),
            status_endpoint: "/api/files/status".to_string(),
            base_url: "https://xinyiheng.github.io/newpody".to_string(),
            episodes_per_page: 6,
            refresh_interval_secs: 30 * 60,
            status_poll_secs: 30,
            search_debounce_ms: 300,
            modal_reveal_delay_ms: 500,
            request_timeout_secs: 10,
            output_path: PathBuf::from("public").join("index.html"),
        }
    }
}

impl Config {
    /// Load from the default location, then apply `.env` and environment overrides.
    pub fn load() -> Result<Self, AppError> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .map(PathBuf::from)
            .or_else(default_config_path);

        let mut config = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };

        let cwd = std::env::current_dir()?;
        config.apply_overrides(|key| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .or_else(|| load_env_value(&cwd, key))
        });

        Ok(config)
    }

    /// Read a YAML config. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {:?}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;

        log::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("ORIGIN") {
            self.origin = v;
        }
        if let Some(v) = lookup("DATA_SOURCE") {
            self.data_source = v;
        }
        if let Some(v) = lookup("BASE_URL") {
            self.base_url = v;
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.episodes_per_page == 0 {
            return Err(AppError::Config("episodes_per_page must be at least 1".into()));
        }
        if self.refresh_interval_secs == 0 || self.status_poll_secs == 0 {
            return Err(AppError::Config("polling intervals must be non-zero".into()));
        }
        Ok(())
    }

    /// Absolute URL for an endpoint; absolute endpoints pass through.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.origin.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn status_poll_interval(&self) -> Duration {
        Duration::from_secs(self.status_poll_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn modal_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.modal_reveal_delay_ms)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("podcast-shelf").join("config.yaml"))
}

/// Load a value from the .env file by key name
pub fn load_env_value(dir: &Path, key: &str) -> Option<String> {
    let env_path = dir.join(".env");
    let prefix = format!("{}=", key);
    let content = std::fs::read_to_string(&env_path).ok()?;
    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(&prefix) {
            let value = rest.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
