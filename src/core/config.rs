//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.menubar/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The resolved config only seeds the initial snapshot; after startup all
//! state changes go through the store.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::core::state::{CurrentView, Platform, Server, StateSnapshot};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MenubarConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
    /// Translation overrides, keyed like `"menus.quit"`.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub app_name: Option<String>,
    pub platform: Option<Platform>,
    /// Url of the server to show at startup.
    pub current_server: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub add_new_servers: Option<bool>,
    pub tray_icon: Option<bool>,
    pub side_bar: Option<bool>,
    pub menu_bar: Option<bool>,
    pub show_window_on_unread: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerEntry {
    pub url: String,
    pub title: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_APP_NAME: &str = "Menubar";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub app_name: String,
    pub platform: Platform,
    pub current_server: Option<String>,
    pub servers: Vec<Server>,
    pub add_new_servers: bool,
    pub tray_icon: bool,
    pub side_bar: bool,
    pub menu_bar: bool,
    pub show_window_on_unread: bool,
    pub labels: HashMap<String, String>,
}

impl ResolvedConfig {
    /// Build the snapshot the store starts from.
    pub fn initial_snapshot(&self) -> StateSnapshot {
        let mut snapshot = StateSnapshot::new(self.app_name.clone(), self.platform);
        snapshot.servers = self.servers.clone();
        snapshot.is_add_new_servers_enabled = self.add_new_servers;
        snapshot.is_tray_icon_enabled = self.tray_icon;
        snapshot.is_side_bar_enabled = self.side_bar;
        snapshot.is_menu_bar_enabled = self.menu_bar;
        snapshot.is_show_window_on_unread_changed_enabled = self.show_window_on_unread;
        snapshot.current_view = match &self.current_server {
            Some(url) if snapshot.server(url).is_some() => CurrentView::Server { url: url.clone() },
            Some(url) => {
                warn!("current_server {} is not in the server list", url);
                snapshot.home_view()
            }
            None => snapshot.home_view(),
        };
        snapshot
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.menubar/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".menubar").join("config.toml"))
}

/// Load config from `~/.menubar/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MenubarConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MenubarConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MenubarConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(MenubarConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: MenubarConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Menubar Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# app_name = "Menubar"               # Or set MENUBAR_APP_NAME
# platform = "linux"                 # "macos", "windows" or "linux"; or MENUBAR_PLATFORM / --platform
# current_server = "https://open.example.com"

# [features]
# add_new_servers = true
# tray_icon = true
# side_bar = true
# menu_bar = true
# show_window_on_unread = false

# [[servers]]
# url = "https://open.example.com"
# title = "Open"

# [[servers]]
# url = "https://chat.example.org"
# title = "R&D"

# [labels]
# "menus.quit" = "Exit {{appName}}"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_platform` is the `--platform` flag (None = not specified).
pub fn resolve(config: &MenubarConfig, cli_platform: Option<Platform>) -> ResolvedConfig {
    // Platform: CLI → env → config → compiled-for platform
    let platform = cli_platform
        .or_else(|| {
            std::env::var("MENUBAR_PLATFORM")
                .ok()
                .and_then(|s| parse_env_platform(&s))
        })
        .or(config.general.platform)
        .unwrap_or_default();

    // App name: env → config → default
    let app_name = std::env::var("MENUBAR_APP_NAME")
        .ok()
        .or_else(|| config.general.app_name.clone())
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

    let features = &config.features;
    ResolvedConfig {
        app_name,
        platform,
        current_server: config.general.current_server.clone(),
        servers: unique_servers(&config.servers),
        add_new_servers: features.add_new_servers.unwrap_or(true),
        tray_icon: features.tray_icon.unwrap_or(true),
        side_bar: features.side_bar.unwrap_or(true),
        menu_bar: features.menu_bar.unwrap_or(true),
        show_window_on_unread: features.show_window_on_unread.unwrap_or(false),
        labels: config.labels.clone(),
    }
}

fn parse_env_platform(value: &str) -> Option<Platform> {
    let parsed = Platform::parse(value);
    if parsed.is_none() {
        warn!("Ignoring unknown MENUBAR_PLATFORM value {:?}", value);
    }
    parsed
}

/// Server urls double as menu item ids, so keep the first entry per url.
fn unique_servers(entries: &[ServerEntry]) -> Vec<Server> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| {
            let fresh = seen.insert(entry.url.as_str());
            if !fresh {
                warn!("Dropping duplicate server entry {}", entry.url);
            }
            fresh
        })
        .map(|entry| Server::new(entry.url.clone(), entry.title.as_deref()))
        .collect()
}
