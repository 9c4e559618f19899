use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HOME_BASE_URL: &str = "https://api-v2-b2sit6oh3a-uc.a.run.app";
const DEFAULT_SEARCH_BASE_URL: &str = "https://mock.apidog.com/m1/735111-711675-default";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DEBOUNCE_MS: u64 = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_home_base_url")]
    pub home_base_url: String,
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_home_base_url() -> String {
    DEFAULT_HOME_BASE_URL.to_string()
}

fn default_search_base_url() -> String {
    DEFAULT_SEARCH_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_base_url: default_home_base_url(),
            search_base_url: default_search_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("alcove").join("config.toml"))
}

impl Config {
    /// Read `~/.config/alcove/config.toml` (platform equivalent). Missing or
    /// malformed files fall back to the defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        toml::from_str(&content).unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
