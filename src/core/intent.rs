//! # Intents
//!
//! Everything the user can ask for through the menu becomes an `Intent`.
//! Clicks a server entry? That's `Intent::SelectServer(url)`.
//! Unticks "Tray icon"? That's `Intent::ToggleTrayIcon(false)`.
//!
//! Menu handlers only describe the request. The `update()` function takes
//! the current state and an intent, then produces the next state. No side
//! effects here.
//!
//! ```text
//! State + Intent  →  update()  →  New State
//! ```
//!
//! On the wire an intent is a named message with an optional payload:
//! `{"type": "SELECT_SERVER", "payload": "https://a"}`.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::state::{CurrentView, StateSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    SelectServer(String),
    ToggleTrayIcon(bool),
    ToggleSideBar(bool),
    ToggleMenuBar(bool),
    ToggleShowWindowOnUnread(bool),
    /// Reported by the window after a full-screen transition.
    FullScreenChanged(bool),
    AddNewServer,
    ShowDownloads,
    OpenSettings,
    CloseSettings,
}

impl Intent {
    /// The message name as it appears in the serialized form.
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::SelectServer(_) => "SELECT_SERVER",
            Intent::ToggleTrayIcon(_) => "TOGGLE_TRAY_ICON",
            Intent::ToggleSideBar(_) => "TOGGLE_SIDE_BAR",
            Intent::ToggleMenuBar(_) => "TOGGLE_MENU_BAR",
            Intent::ToggleShowWindowOnUnread(_) => "TOGGLE_SHOW_WINDOW_ON_UNREAD",
            Intent::FullScreenChanged(_) => "FULL_SCREEN_CHANGED",
            Intent::AddNewServer => "ADD_NEW_SERVER",
            Intent::ShowDownloads => "SHOW_DOWNLOADS",
            Intent::OpenSettings => "OPEN_SETTINGS",
            Intent::CloseSettings => "CLOSE_SETTINGS",
        }
    }
}

/// Applies an intent to a working copy of the state.
///
/// The store calls this on a clone of the current snapshot and only
/// publishes the result when it differs from what it already holds.
pub fn update(state: &mut StateSnapshot, intent: &Intent) {
    match intent {
        Intent::SelectServer(url) => {
            if state.server(url).is_none() {
                warn!("Ignoring selection of unknown server {}", url);
                return;
            }
            state.current_view = CurrentView::Server { url: url.clone() };
        }
        Intent::ToggleTrayIcon(enabled) => state.is_tray_icon_enabled = *enabled,
        Intent::ToggleSideBar(enabled) => state.is_side_bar_enabled = *enabled,
        Intent::ToggleMenuBar(enabled) => state.is_menu_bar_enabled = *enabled,
        Intent::ToggleShowWindowOnUnread(enabled) => {
            state.is_show_window_on_unread_changed_enabled = *enabled
        }
        Intent::FullScreenChanged(enabled) => state.root_window_state.fullscreen = *enabled,
        Intent::AddNewServer => state.current_view = CurrentView::AddNewServer,
        Intent::ShowDownloads => state.current_view = CurrentView::Downloads,
        Intent::OpenSettings => state.current_view = CurrentView::Settings,
        Intent::CloseSettings => {
            if state.current_view == CurrentView::Settings {
                state.current_view = state.home_view();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{Platform, Server};

    fn state_with_servers() -> StateSnapshot {
        let mut state = StateSnapshot::new("Menubar", Platform::Linux);
        state.servers = vec![Server::new("a", Some("Alpha")), Server::new("b", None)];
        state
    }

    #[test]
    fn test_intent_wire_format() {
        let json = serde_json::to_value(Intent::SelectServer("b".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "SELECT_SERVER", "payload": "b" }));

        let json = serde_json::to_value(Intent::ToggleTrayIcon(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "TOGGLE_TRAY_ICON", "payload": true }));

        let json = serde_json::to_value(Intent::ShowDownloads).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "SHOW_DOWNLOADS" }));
    }

    #[test]
    fn test_kind_matches_serialized_type() {
        for intent in [
            Intent::SelectServer("a".into()),
            Intent::ToggleShowWindowOnUnread(false),
            Intent::FullScreenChanged(true),
            Intent::CloseSettings,
        ] {
            let json = serde_json::to_value(&intent).unwrap();
            assert_eq!(json["type"], intent.kind());
        }
    }

    #[test]
    fn test_select_known_server() {
        let mut state = state_with_servers();
        update(&mut state, &Intent::SelectServer("b".into()));
        assert_eq!(state.current_view, CurrentView::Server { url: "b".into() });
    }

    #[test]
    fn test_select_unknown_server_is_ignored() {
        let mut state = state_with_servers();
        let before = state.clone();
        update(&mut state, &Intent::SelectServer("zzz".into()));
        assert_eq!(state, before);
    }

    #[test]
    fn test_toggles() {
        let mut state = state_with_servers();
        update(&mut state, &Intent::ToggleTrayIcon(false));
        update(&mut state, &Intent::ToggleShowWindowOnUnread(true));
        update(&mut state, &Intent::FullScreenChanged(true));
        assert!(!state.is_tray_icon_enabled);
        assert!(state.is_show_window_on_unread_changed_enabled);
        assert!(state.root_window_state.fullscreen);
    }

    #[test]
    fn test_close_settings_returns_home() {
        let mut state = state_with_servers();
        update(&mut state, &Intent::OpenSettings);
        assert_eq!(state.current_view, CurrentView::Settings);
        update(&mut state, &Intent::CloseSettings);
        assert_eq!(state.current_view, CurrentView::Server { url: "a".into() });
    }

    #[test]
    fn test_close_settings_outside_settings_is_noop() {
        let mut state = state_with_servers();
        update(&mut state, &Intent::ShowDownloads);
        update(&mut state, &Intent::CloseSettings);
        assert_eq!(state.current_view, CurrentView::Downloads);
    }
}
