use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::query::{DEFAULT_PAGE_SIZE, PAGE_SIZES};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub events: EventsConfig,
}

impl Config {
    /// Page size snapped to one of the selectable sizes
    pub fn page_size(&self) -> u32 {
        if PAGE_SIZES.contains(&self.events.page_size) {
            self.events.page_size
        } else {
            DEFAULT_PAGE_SIZE
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    parse(&content)
}

pub fn parse(content: &str) -> Config {
    match toml::from_str::<Config>(content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("ignoring malformed config: {err}");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("EVCAL_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("evcal").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("evcal").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "evcal", "evcal")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("evcal"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("evcal"));
    }
    directories::ProjectDirs::from("io", "evcal", "evcal")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn token_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("tokens.sqlite3"))
}

pub fn log_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("evcal.log"))
}
