//! # Application State
//!
//! The immutable snapshot the menu is projected from. This module contains
//! domain data only - no menu or terminal types.
//!
//! ```text
//! StateSnapshot
//! ├── version: u64                          // bumped by the store on every mutation
//! ├── app_name: String                      // shown in the app menu on macOS
//! ├── platform: Platform                    // host menu conventions
//! ├── current_view: CurrentView             // what the main window is showing
//! ├── servers: Vec<Server>                  // one window-menu entry each
//! ├── is_add_new_servers_enabled: bool      // feature flags...
//! ├── is_side_bar_enabled: bool
//! ├── is_tray_icon_enabled: bool
//! ├── is_menu_bar_enabled: bool
//! ├── is_show_window_on_unread_changed_enabled: bool
//! └── root_window_state: RootWindowState    // window geometry flags
//! ```
//!
//! Snapshots are never edited in place by consumers. The store clones the
//! current one, applies an `Intent` through `update()` in intent.rs, and
//! publishes the result as a brand new `Arc<StateSnapshot>`.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host platform, which decides menu conventions (global vs per-window menu,
/// accelerators, platform-only items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[value(name = "macos")]
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Parses the lowercase names used in config files and env vars.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "mac" => Some(Platform::MacOs),
            "windows" | "win32" => Some(Platform::Windows),
            "linux" => Some(Platform::Linux),
            _ => None,
        }
    }

    pub fn is_mac(self) -> bool {
        self == Platform::MacOs
    }

    /// True where one menu is shared by the whole process instead of being
    /// attached to a window.
    pub fn has_global_menu(self) -> bool {
        self.is_mac()
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::MacOs => write!(f, "macos"),
            Platform::Windows => write!(f, "windows"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Server {
    pub fn new(url: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            url: url.into(),
            title: title.map(str::to_owned),
        }
    }
}

/// What the main window is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CurrentView {
    #[default]
    AddNewServer,
    Downloads,
    Settings,
    Server { url: String },
}

impl CurrentView {
    /// The url of the active server view, if there is one with a non-empty url.
    pub fn server_url(&self) -> Option<&str> {
        match self {
            CurrentView::Server { url } if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RootWindowState {
    pub fullscreen: bool,
    pub maximized: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub version: u64,
    pub app_name: String,
    pub platform: Platform,
    pub current_view: CurrentView,
    pub servers: Vec<Server>,
    pub is_add_new_servers_enabled: bool,
    pub is_side_bar_enabled: bool,
    pub is_tray_icon_enabled: bool,
    pub is_menu_bar_enabled: bool,
    pub is_show_window_on_unread_changed_enabled: bool,
    pub root_window_state: RootWindowState,
}

impl StateSnapshot {
    pub fn new(app_name: impl Into<String>, platform: Platform) -> Self {
        Self {
            version: 0,
            app_name: app_name.into(),
            platform,
            current_view: CurrentView::default(),
            servers: Vec::new(),
            is_add_new_servers_enabled: true,
            is_side_bar_enabled: true,
            is_tray_icon_enabled: true,
            is_menu_bar_enabled: true,
            is_show_window_on_unread_changed_enabled: false,
            root_window_state: RootWindowState::default(),
        }
    }

    pub fn server(&self, url: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.url == url)
    }

    /// The view to fall back to when leaving settings: the first server, or
    /// the add-server screen when none are configured.
    pub fn home_view(&self) -> CurrentView {
        match self.servers.first() {
            Some(server) => CurrentView::Server {
                url: server.url.clone(),
            },
            None => CurrentView::AddNewServer,
        }
    }
}
