//! Application configuration loading from config.toml
//!
//! Every section and key is optional: a missing key takes its default and a missing file
//! yields the default configuration. `LNIWORKS_API_URL` overrides the backend URL and
//! `LNIWORKS_ALLOWED_USERS` (comma-separated Discord user ids) the access list.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend connection
    pub api: ApiConfig,
    /// Default season and shift selection
    pub selection: SelectionConfig,
    /// Dashboard display
    pub dashboard: DashboardConfig,
    /// Reports view and export
    pub reports: ReportsConfig,
    /// Who may use the bot
    pub access: AccessConfig,
}

/// `[api]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the lniworks backend
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// `[selection]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Season name selected when nothing is selected yet
    pub default_season: String,
    /// Shift number the dashboard and orders views start on
    pub default_shift_number: i32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_season: "2025".to_string(),
            default_shift_number: 6,
        }
    }
}

/// `[dashboard]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Entries per recent list
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { recent_limit: 6 }
    }
}

/// `[reports]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Orders per page of the reports table
    pub page_size: usize,
    /// File name of the report orders export
    pub export_filename: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            page_size: 8,
            export_filename: "LNIspent.xlsx".to_string(),
        }
    }
}

/// `[access]` section
///
/// The bot holds one backend session for the whole club, so only the listed Discord
/// users may log in or act through it. An empty list locks every such command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Discord user ids of the club staff
    pub allowed_users: Vec<u64>,
}

impl AccessConfig {
    /// Whether the Discord user `user_id` may use the club session.
    #[must_use]
    pub fn allows(&self, user_id: u64) -> bool {
        self.allowed_users.contains(&user_id)
    }
}

/// Parses a comma-separated list of Discord user ids, skipping malformed entries.
fn parse_user_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter_map(|id| {
            id.parse()
                .inspect_err(|_| warn!("Ignoring malformed Discord user id '{id}'"))
                .ok()
        })
        .collect()
}

impl AppConfig {
    /// Applies environment overrides (`LNIWORKS_API_URL`, `LNIWORKS_ALLOWED_USERS`).
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("LNIWORKS_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(ids) = std::env::var("LNIWORKS_ALLOWED_USERS") {
            self.access.allowed_users = parse_user_ids(&ids);
        }
        self
    }
}

/// Loads configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Returns
/// * `Ok(AppConfig)` - Parsed configuration, or the defaults if the file does not exist
/// * `Err(Error)` - The file exists but cannot be read or parsed
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No {} found, using default configuration", path.display());
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from the default location (./config.toml) and applies environment
/// overrides
pub fn load_default_config() -> Result<AppConfig> {
    Ok(load_config("config.toml")?.with_env_overrides())
}
