use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ads: AdsConfig,
    #[serde(default)]
    pub caption: CaptionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("animedex.db")
}

/// Catalog query defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Episodes indexed less than this many hours ago are flagged recent.
    #[serde(default = "default_recent_window_hours")]
    pub recent_window_hours: i64,
    /// Default size of the recently-added list.
    #[serde(default = "default_list_limit")]
    pub latest_limit: u32,
    /// Default size of the trending list.
    #[serde(default = "default_list_limit")]
    pub trending_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            recent_window_hours: default_recent_window_hours(),
            latest_limit: default_list_limit(),
            trending_limit: default_list_limit(),
        }
    }
}

impl CatalogConfig {
    pub fn recent_window(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.recent_window_hours).unwrap_or(chrono::Duration::MAX)
    }
}

fn default_recent_window_hours() -> i64 {
    crate::catalog::DEFAULT_RECENT_WINDOW_HOURS
}

fn default_list_limit() -> u32 {
    10
}

/// Ad cooldown configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdsConfig {
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl AdsConfig {
    pub fn cooldown_window(&self) -> chrono::Duration {
        i64::try_from(self.cooldown_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

fn default_cooldown_secs() -> u64 {
    crate::settings::DEFAULT_AD_COOLDOWN_SECS
}

/// Caption configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaptionConfig {
    /// Mode used until one is stored in settings (1 = original, 2 = clean, 3 = empty).
    #[serde(default = "default_caption_mode")]
    pub default_mode: u8,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            default_mode: default_caption_mode(),
        }
    }
}

fn default_caption_mode() -> u8 {
    crate::caption::CaptionMode::default().code()
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: SanitizedDatabaseConfig,
    pub catalog: CatalogConfig,
    pub ads: AdsConfig,
    pub caption: CaptionConfig,
}

/// Only the file name of the database is exposed.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDatabaseConfig {
    pub file_name: Option<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: SanitizedDatabaseConfig {
                file_name: config
                    .database
                    .path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned()),
            },
            catalog: config.catalog.clone(),
            ads: config.ads.clone(),
            caption: config.caption.clone(),
        }
    }
}
