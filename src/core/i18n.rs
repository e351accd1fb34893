//! # Translation
//!
//! Menu labels are looked up through `Translate::text(key, params)`, a pure
//! and total function: unknown keys come back as the key itself so a missing
//! entry shows up as `menus.something` instead of failing.
//!
//! Parameters use i18next-style placeholders: `"Quit {{appName}}"`.
//!
//! A leading `&` marks the mnemonic letter (`"&File"`); a literal ampersand
//! is written `&&`. Hosts strip these when drawing.

use std::collections::HashMap;

pub trait Translate: Send + Sync {
    fn text(&self, key: &str, params: &[(&str, &str)]) -> String;
}

const ENGLISH: &[(&str, &str)] = &[
    ("menus.fileMenu", "&File"),
    ("menus.viewMenu", "&View"),
    ("menus.windowMenu", "&Window"),
    ("menus.settings", "&Preferences"),
    ("menus.quit", "&Quit {{appName}}"),
    ("menus.addNewServer", "&Add new server"),
    ("menus.reload", "&Reload"),
    ("menus.reloadIgnoringCache", "Reload ignoring cache"),
    ("menus.back", "&Back"),
    ("menus.forward", "&Forward"),
    ("menus.showTrayIcon", "Tray icon"),
    ("menus.showSideBar", "Server list"),
    ("menus.showMenuBar", "Menu bar"),
    ("menus.showFullScreen", "Full screen"),
    ("menus.resetZoom", "Reset zoom"),
    ("menus.zoomIn", "Zoom in"),
    ("menus.zoomOut", "Zoom out"),
    ("menus.downloads", "Downloads"),
    ("menus.showOnUnreadMessage", "Show on unread messages"),
    ("menus.minimize", "&Minimize"),
    ("menus.close", "&Close"),
    ("settings.title", "Settings"),
    ("settings.general", "General"),
    ("settings.certificates", "Certificates"),
    ("settings.options.trayIcon", "Show tray icon"),
    ("settings.options.sideBar", "Show server list"),
    ("settings.options.menuBar", "Show menu bar"),
    ("settings.options.showOnUnread", "Show window on unread messages"),
    ("settings.certificates.empty", "No trusted certificates."),
    ("settings.hint", "Tab switches sections, Esc closes"),
    ("views.addNewServer", "Add a server to get started."),
    ("views.downloads", "No downloads yet."),
    ("views.server", "Connected to {{url}}"),
    ("views.hidden", "Window hidden. Press F10 to open the menu."),
];

/// A flat key → template table.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// The built-in English labels.
    pub fn english() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Replace or add entries (from the `[labels]` config table).
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (key, value) in overrides {
            self.entries.insert(key.clone(), value.clone());
        }
        self
    }
}

impl Translate for Catalog {
    fn text(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = self.entries.get(key).map(String::as_str).unwrap_or(key);
        interpolate(template, params)
    }
}

fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{{{name}}}}}"), value);
    }
    out
}

/// Strip mnemonic markers for display: `&File` → `File`, `A && B` → `A & B`.
pub fn strip_mnemonic(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if chars.peek() == Some(&'&') {
                chars.next();
                out.push('&');
            }
            continue;
        }
        out.push(c);
    }
    out
}

/// Escape a literal string so no character is taken as a mnemonic.
pub fn escape_mnemonic(label: &str) -> String {
    label.replace('&', "&&")
}
