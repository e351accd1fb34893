//! # Render Sink
//!
//! The boundary to the native menu API. A host implements [`MenuHost`];
//! [`render`] turns a composed tree into a [`NativeMenu`] and hands it over
//! in a single replace call. There is no incremental patching: whatever the
//! host shows is always one complete tree.
//!
//! `NativeMenu` mirrors what native toolkits expect: a plain item tree with
//! numeric command ids, plus a table from command id to handler. Clicking an
//! item means looking its command up and running the handler with the click
//! the toolkit would deliver.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::core::state::Platform;
use crate::menu::dispatch::ZoomLevel;
use crate::menu::node::{Activation, Click, Handler, MenuNode};

/// Errors reported by the native layer. Not recovered here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The native API refused the menu.
    Rejected(String),
    /// The native side is gone (e.g. the event loop shut down).
    Disconnected,
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Rejected(msg) => write!(f, "native menu rejected: {msg}"),
            SinkError::Disconnected => write!(f, "native menu host disconnected"),
        }
    }
}

impl std::error::Error for SinkError {}

/// The application window as seen by menu handlers.
pub trait AppWindow: Send + Sync {
    fn is_visible(&self) -> bool;
    /// Show without taking activation away from whatever has it.
    fn show_inactive(&self);
    fn focus(&self);
    fn set_full_screen(&self, enabled: bool);
    fn minimize(&self);
    fn close(&self);
}

/// The web content behind one server view.
pub trait ContentTarget: Send + Sync {
    fn reload(&self);
    fn reload_ignoring_cache(&self);
    fn go_back(&self);
    fn go_forward(&self);
    fn zoom_level(&self) -> ZoomLevel;
    fn set_zoom_level(&self, level: ZoomLevel);
}

#[async_trait]
pub trait MenuHost: Send + Sync {
    /// Replace the process-wide menu. `None` removes it.
    fn set_process_menu(&self, menu: Option<&NativeMenu>) -> Result<(), SinkError>;

    /// Replace the menu attached to `window`. `None` removes it.
    fn set_window_menu(&self, window: &dyn AppWindow, menu: Option<&NativeMenu>) -> Result<(), SinkError>;

    /// Resolve the main window, waiting while it is still being created.
    /// `None` means the host went away before a window existed.
    async fn active_window(&self) -> Option<Arc<dyn AppWindow>>;

    /// Web content for a server url, if that view exists.
    fn content(&self, url: &str) -> Option<Arc<dyn ContentTarget>>;

    fn quit(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeItemKind {
    Normal,
    Checkbox { checked: bool },
    Submenu(Vec<NativeItem>),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeItem {
    pub id: Option<String>,
    pub label: String,
    pub enabled: bool,
    pub accelerator: Option<String>,
    pub kind: NativeItemKind,
    /// Set for clickable leaves only.
    pub command: Option<CommandId>,
}

impl NativeItem {
    pub fn children(&self) -> &[NativeItem] {
        match &self.kind {
            NativeItemKind::Submenu(children) => children,
            _ => &[],
        }
    }

    pub fn is_separator(&self) -> bool {
        self.kind == NativeItemKind::Separator
    }
}

struct Command {
    handler: Handler,
    click: Click,
    enabled: bool,
}

#[derive(Clone)]
pub struct NativeMenu {
    pub items: Vec<NativeItem>,
    commands: Arc<HashMap<CommandId, Command>>,
}

impl NativeMenu {
    /// Convert a composed tree. The root's children become the top-level
    /// entries of the menu bar.
    pub fn build(tree: &MenuNode) -> Self {
        let mut commands = HashMap::new();
        let mut next_id = 1;
        let items = match tree {
            MenuNode::Submenu(root) => root
                .children
                .iter()
                .map(|child| build_item(child, &mut commands, &mut next_id))
                .collect(),
            other => vec![build_item(other, &mut commands, &mut next_id)],
        };
        Self {
            items,
            commands: Arc::new(commands),
        }
    }

    /// Run the handler behind `command`. Disabled or unknown commands yield nothing.
    pub fn activate(&self, command: CommandId) -> Option<Activation> {
        let entry = self.commands.get(&command)?;
        if !entry.enabled {
            debug!("Ignoring click on disabled command {:?}", command);
            return None;
        }
        Some((entry.handler)(&entry.click))
    }

    /// Depth-first lookup of the item with `id`.
    pub fn item(&self, id: &str) -> Option<&NativeItem> {
        fn walk<'a>(items: &'a [NativeItem], id: &str) -> Option<&'a NativeItem> {
            items.iter().find_map(|item| {
                if item.id.as_deref() == Some(id) {
                    Some(item)
                } else {
                    walk(item.children(), id)
                }
            })
        }
        walk(&self.items, id)
    }

    pub fn command_for(&self, id: &str) -> Option<CommandId> {
        self.item(id).and_then(|item| item.command)
    }

    /// First enabled command whose accelerator satisfies `matches`.
    pub fn command_for_accelerator(&self, matches: impl Fn(&str) -> bool) -> Option<CommandId> {
        fn walk(items: &[NativeItem], matches: &dyn Fn(&str) -> bool) -> Option<CommandId> {
            items.iter().find_map(|item| match (&item.accelerator, item.command) {
                (Some(accel), Some(command)) if item.enabled && matches(accel) => Some(command),
                _ => walk(item.children(), matches),
            })
        }
        walk(&self.items, &matches)
    }
}

impl fmt::Debug for NativeMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeMenu")
            .field("items", &self.items)
            .field("commands", &self.commands.len())
            .finish()
    }
}

fn build_item(node: &MenuNode, commands: &mut HashMap<CommandId, Command>, next_id: &mut u32) -> NativeItem {
    match node {
        MenuNode::Leaf(leaf) => {
            let command = CommandId(*next_id);
            *next_id += 1;
            commands.insert(
                command,
                Command {
                    handler: Arc::clone(&leaf.on_activate),
                    click: leaf.click(),
                    enabled: leaf.enabled,
                },
            );
            NativeItem {
                id: Some(leaf.id.clone()),
                label: leaf.label.clone(),
                enabled: leaf.enabled,
                accelerator: leaf.accelerator.clone(),
                kind: match leaf.checked {
                    Some(checked) => NativeItemKind::Checkbox { checked },
                    None => NativeItemKind::Normal,
                },
                command: Some(command),
            }
        }
        MenuNode::Submenu(submenu) => NativeItem {
            id: Some(submenu.id.clone()),
            label: submenu.label.clone(),
            enabled: true,
            accelerator: None,
            kind: NativeItemKind::Submenu(
                submenu
                    .children
                    .iter()
                    .map(|child| build_item(child, commands, next_id))
                    .collect(),
            ),
            command: None,
        },
        MenuNode::Separator => NativeItem {
            id: None,
            label: String::new(),
            enabled: true,
            accelerator: None,
            kind: NativeItemKind::Separator,
            command: None,
        },
    }
}

/// Replace the host's menu with `tree`.
///
/// On platforms with a global menu the process menu is set directly.
/// Elsewhere the process menu is cleared and the menu is attached to the
/// main window once it resolves; if the host closes first, nothing happens.
pub async fn render(host: &dyn MenuHost, platform: Platform, tree: &MenuNode) -> Result<(), SinkError> {
    let menu = NativeMenu::build(tree);

    if platform.has_global_menu() {
        host.set_process_menu(Some(&menu))?;
        info!("Application menu replaced ({} menus)", menu.items.len());
        return Ok(());
    }

    host.set_process_menu(None)?;
    let Some(window) = host.active_window().await else {
        debug!("Window closed before the menu could be attached");
        return Ok(());
    };
    host.set_window_menu(window.as_ref(), Some(&menu))?;
    info!("Window menu replaced ({} menus)", menu.items.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::intent::Intent;
    use crate::menu::node::{Leaf, Submenu};
    use crate::test_support::RecordingHost;

    fn tree() -> MenuNode {
        MenuNode::Submenu(Submenu {
            id: "menuBar".into(),
            label: String::new(),
            children: vec![
                Submenu {
                    id: "viewMenu".into(),
                    label: "View".into(),
                    children: vec![
                        Leaf::new("reload", "Reload", |_| Activation::Quit)
                            .enabled(false)
                            .accelerator("CommandOrControl+R")
                            .into(),
                        MenuNode::Separator,
                        Leaf::new("showTrayIcon", "Tray", |c| {
                            Activation::Dispatch(Intent::ToggleTrayIcon(c.checked))
                        })
                        .checkbox(true)
                        .accelerator("Ctrl+Shift+T")
                        .into(),
                    ],
                }
                .into(),
            ],
        })
    }

    #[test]
    fn test_build_flattens_root() {
        let menu = NativeMenu::build(&tree());
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.items[0].label, "View");
        assert_eq!(menu.items[0].children().len(), 3);
        assert!(menu.items[0].children()[1].is_separator());
        assert_eq!(
            menu.item("showTrayIcon").unwrap().kind,
            NativeItemKind::Checkbox { checked: true }
        );
    }

    #[test]
    fn test_activate_runs_handler_with_native_click() {
        let menu = NativeMenu::build(&tree());
        let command = menu.command_for("showTrayIcon").unwrap();
        assert_eq!(
            menu.activate(command),
            Some(Activation::Dispatch(Intent::ToggleTrayIcon(false)))
        );
    }

    #[test]
    fn test_disabled_and_unknown_commands_do_nothing() {
        let menu = NativeMenu::build(&tree());
        let reload = menu.command_for("reload").unwrap();
        assert_eq!(menu.activate(reload), None);
        assert_eq!(menu.activate(CommandId(999)), None);
    }

    #[test]
    fn test_accelerator_lookup_skips_disabled() {
        let menu = NativeMenu::build(&tree());
        assert_eq!(menu.command_for_accelerator(|a| a == "CommandOrControl+R"), None);
        assert_eq!(
            menu.command_for_accelerator(|a| a == "Ctrl+Shift+T"),
            menu.command_for("showTrayIcon")
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = NativeMenu::build(&tree());
        let b = NativeMenu::build(&tree());
        assert_eq!(a.items, b.items);
    }

    #[tokio::test]
    async fn test_render_global_menu() {
        let host = RecordingHost::new();
        render(host.as_ref(), Platform::MacOs, &tree()).await.unwrap();
        let process = host.process_menus();
        assert_eq!(process.len(), 1);
        assert!(process[0].is_some());
        assert!(host.window_menus().is_empty());
    }

    #[tokio::test]
    async fn test_render_window_menu() {
        let host = RecordingHost::new();
        render(host.as_ref(), Platform::Windows, &tree()).await.unwrap();
        let process = host.process_menus();
        assert_eq!(process.len(), 1);
        assert!(process[0].is_none());
        let window = host.window_menus();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].as_ref().unwrap().items[0].label, "View");
    }

    #[tokio::test]
    async fn test_render_skips_when_window_never_appears() {
        let host = RecordingHost::pending();
        host.close();
        render(host.as_ref(), Platform::Linux, &tree()).await.unwrap();
        assert!(host.window_menus().is_empty());
    }

    #[tokio::test]
    async fn test_render_propagates_sink_failure() {
        let host = RecordingHost::new();
        host.fail_with(SinkError::Rejected("boom".into()));
        let err = render(host.as_ref(), Platform::MacOs, &tree()).await.unwrap_err();
        assert_eq!(err, SinkError::Rejected("boom".into()));
    }
}
