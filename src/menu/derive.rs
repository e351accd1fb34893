//! # Derivations
//!
//! Pure functions from a narrow slice of the snapshot to one top-level
//! [`Fragment`]. Each derivation names the slice it reads as its `Deps`
//! type; [`Memo`] re-runs the derivation only when that slice changes, so a
//! flurry of unrelated state updates costs one struct comparison each.
//!
//! Derivations never fail. No servers, no active view: the fragment is still
//! well formed, just shorter or with items disabled.

use std::fmt;
use std::marker::PhantomData;

use log::debug;

use crate::core::i18n::{Translate, escape_mnemonic};
use crate::core::intent::Intent;
use crate::core::state::{CurrentView, Platform, Server, StateSnapshot};
use crate::menu::compose::{Condition, Feature, Fragment, Predicate};
use crate::menu::node::{Activation, ContentOp, Leaf, MenuNode, WindowOp};

pub trait Derivation {
    /// The snapshot fields this derivation reads.
    type Deps: Clone + PartialEq + fmt::Debug;

    const ID: &'static str;

    fn select(snapshot: &StateSnapshot) -> Self::Deps;

    fn derive(deps: &Self::Deps, t: &dyn Translate) -> Fragment;
}

/// Caches the last fragment of a derivation, keyed by its deps.
pub struct Memo<D: Derivation> {
    cached: Option<(D::Deps, Fragment)>,
    recomputations: usize,
    _derivation: PhantomData<D>,
}

impl<D: Derivation> Memo<D> {
    pub fn new() -> Self {
        Self {
            cached: None,
            recomputations: 0,
            _derivation: PhantomData,
        }
    }

    pub fn get(&mut self, snapshot: &StateSnapshot, t: &dyn Translate) -> Fragment {
        let deps = D::select(snapshot);
        if let Some((previous, fragment)) = &self.cached
            && *previous == deps
        {
            return fragment.clone();
        }
        debug!("Recomputing {} at version {}", D::ID, snapshot.version);
        let fragment = D::derive(&deps, t);
        self.recomputations += 1;
        self.cached = Some((deps, fragment.clone()));
        fragment
    }

    /// How many times the derivation actually ran.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

impl<D: Derivation> Default for Memo<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Accelerators that differ between macOS and everything else.
fn accel(platform: Platform, mac: &str, other: &str) -> String {
    let accelerator = if platform.is_mac() { mac } else { other };
    accelerator.to_string()
}

fn add_new_server(t: &dyn Translate) -> MenuNode {
    Leaf::dispatch("addNewServer", t.text("menus.addNewServer", &[]), Intent::AddNewServer)
        .accelerator("CommandOrControl+N")
        .into()
}

// ============================================================================
// App menu
// ============================================================================

pub struct AppMenu;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMenuDeps {
    pub platform: Platform,
    pub app_name: String,
}

impl Derivation for AppMenu {
    type Deps = AppMenuDeps;
    const ID: &'static str = "appMenu";

    fn select(snapshot: &StateSnapshot) -> AppMenuDeps {
        AppMenuDeps {
            platform: snapshot.platform,
            app_name: snapshot.app_name.clone(),
        }
    }

    fn derive(deps: &AppMenuDeps, t: &dyn Translate) -> Fragment {
        let label = if deps.platform.is_mac() {
            escape_mnemonic(&deps.app_name)
        } else {
            t.text("menus.fileMenu", &[])
        };
        Fragment::new(Self::ID, label)
            .block(
                Predicate::all([
                    Condition::NotOn(Platform::MacOs),
                    Condition::Enabled(Feature::AddNewServers),
                ]),
                vec![add_new_server(t), MenuNode::Separator],
            )
            .items(vec![
                Leaf::dispatch("settings", t.text("menus.settings", &[]), Intent::OpenSettings)
                    .accelerator("CommandOrControl+,")
                    .into(),
                MenuNode::Separator,
                Leaf::new(
                    "quit",
                    t.text("menus.quit", &[("appName", &escape_mnemonic(&deps.app_name))]),
                    |_| Activation::Quit,
                )
                .accelerator("CommandOrControl+Q")
                .into(),
            ])
    }
}

// ============================================================================
// View menu
// ============================================================================

pub struct ViewMenu;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewMenuDeps {
    pub platform: Platform,
    /// Only the active server url matters here, not which non-server view is up.
    pub current_url: Option<String>,
    pub is_tray_icon_enabled: bool,
    pub is_side_bar_enabled: bool,
    pub is_menu_bar_enabled: bool,
    pub fullscreen: bool,
}

fn content_leaf(id: &str, label: String, url: &Option<String>, op: ContentOp) -> Leaf {
    let target = url.clone();
    Leaf::new(id, label, move |_| Activation::Content {
        url: target.clone(),
        op,
    })
}

impl Derivation for ViewMenu {
    type Deps = ViewMenuDeps;
    const ID: &'static str = "viewMenu";

    fn select(snapshot: &StateSnapshot) -> ViewMenuDeps {
        ViewMenuDeps {
            platform: snapshot.platform,
            current_url: snapshot.current_view.server_url().map(str::to_owned),
            is_tray_icon_enabled: snapshot.is_tray_icon_enabled,
            is_side_bar_enabled: snapshot.is_side_bar_enabled,
            is_menu_bar_enabled: snapshot.is_menu_bar_enabled,
            fullscreen: snapshot.root_window_state.fullscreen,
        }
    }

    fn derive(deps: &ViewMenuDeps, t: &dyn Translate) -> Fragment {
        let platform = deps.platform;
        let url = &deps.current_url;
        let has_content = url.is_some();

        let navigation = vec![
            content_leaf("reload", t.text("menus.reload", &[]), url, ContentOp::Reload)
                .enabled(has_content)
                .accelerator("CommandOrControl+R")
                .into(),
            content_leaf(
                "reloadIgnoringCache",
                t.text("menus.reloadIgnoringCache", &[]),
                url,
                ContentOp::ReloadIgnoringCache,
            )
            .enabled(has_content)
            .into(),
            content_leaf("back", t.text("menus.back", &[]), url, ContentOp::GoBack)
                .enabled(has_content)
                .accelerator(accel(platform, "Command+[", "Alt+Left"))
                .into(),
            content_leaf("forward", t.text("menus.forward", &[]), url, ContentOp::GoForward)
                .enabled(has_content)
                .accelerator(accel(platform, "Command+]", "Alt+Right"))
                .into(),
            MenuNode::Separator,
            Leaf::new("showTrayIcon", t.text("menus.showTrayIcon", &[]), |click| {
                Activation::Dispatch(Intent::ToggleTrayIcon(click.checked))
            })
            .checkbox(deps.is_tray_icon_enabled)
            .accelerator(accel(platform, "Shift+Command+T", "Ctrl+Shift+T"))
            .into(),
            Leaf::new("showSideBar", t.text("menus.showSideBar", &[]), |click| {
                Activation::Dispatch(Intent::ToggleSideBar(click.checked))
            })
            .checkbox(deps.is_side_bar_enabled)
            .accelerator(accel(platform, "Shift+Command+S", "Ctrl+Shift+S"))
            .into(),
        ];

        let menu_bar_toggle = vec![
            Leaf::new("showMenuBar", t.text("menus.showMenuBar", &[]), |click| {
                Activation::Dispatch(Intent::ToggleMenuBar(click.checked))
            })
            .checkbox(deps.is_menu_bar_enabled)
            .accelerator("Ctrl+Shift+M")
            .into(),
        ];

        let full_screen_toggle = vec![
            Leaf::new("showFullScreen", t.text("menus.showFullScreen", &[]), |click| {
                Activation::FullScreen(click.checked)
            })
            .checkbox(deps.fullscreen)
            .accelerator("Control+Command+F")
            .into(),
        ];

        let zoom = vec![
            MenuNode::Separator,
            content_leaf("resetZoom", t.text("menus.resetZoom", &[]), url, ContentOp::ResetZoom)
                .accelerator("CommandOrControl+0")
                .into(),
            content_leaf("zoomIn", t.text("menus.zoomIn", &[]), url, ContentOp::ZoomIn)
                .accelerator("CommandOrControl+Plus")
                .into(),
            content_leaf("zoomOut", t.text("menus.zoomOut", &[]), url, ContentOp::ZoomOut)
                .accelerator("CommandOrControl+-")
                .into(),
        ];

        Fragment::new(Self::ID, t.text("menus.viewMenu", &[]))
            .items(navigation)
            .block(Predicate::when(Condition::NotOn(Platform::MacOs)), menu_bar_toggle)
            .block(Predicate::when(Condition::On(Platform::MacOs)), full_screen_toggle)
            .items(zoom)
    }
}

// ============================================================================
// Window menu
// ============================================================================

pub struct WindowMenu;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowMenuDeps {
    pub servers: Vec<Server>,
    pub current_view: CurrentView,
    pub is_show_window_on_unread_changed_enabled: bool,
}

/// Only the first nine servers get a numeric shortcut.
const MAX_SERVER_SHORTCUTS: usize = 9;

fn server_leaf(index: usize, server: &Server, current_view: &CurrentView) -> MenuNode {
    let label = match &server.title {
        Some(title) if !title.is_empty() => escape_mnemonic(title),
        _ => escape_mnemonic(&server.url),
    };
    let mut leaf = Leaf::dispatch(
        server.url.clone(),
        label,
        Intent::SelectServer(server.url.clone()),
    );
    if current_view.server_url() == Some(server.url.as_str()) {
        leaf = leaf.checkbox(true);
    }
    if index < MAX_SERVER_SHORTCUTS {
        leaf = leaf.accelerator(format!("CommandOrControl+{}", index + 1));
    }
    leaf.into()
}

impl Derivation for WindowMenu {
    type Deps = WindowMenuDeps;
    const ID: &'static str = "windowMenu";

    fn select(snapshot: &StateSnapshot) -> WindowMenuDeps {
        WindowMenuDeps {
            servers: snapshot.servers.clone(),
            current_view: snapshot.current_view.clone(),
            is_show_window_on_unread_changed_enabled: snapshot
                .is_show_window_on_unread_changed_enabled,
        }
    }

    fn derive(deps: &WindowMenuDeps, t: &dyn Translate) -> Fragment {
        let mut servers: Vec<MenuNode> = deps
            .servers
            .iter()
            .enumerate()
            .map(|(i, server)| server_leaf(i, server, &deps.current_view))
            .collect();
        if !servers.is_empty() {
            servers.push(MenuNode::Separator);
        }

        Fragment::new(Self::ID, t.text("menus.windowMenu", &[]))
            .block(
                Predicate::all([
                    Condition::On(Platform::MacOs),
                    Condition::Enabled(Feature::AddNewServers),
                ]),
                vec![add_new_server(t), MenuNode::Separator],
            )
            .items(servers)
            .items(vec![
                Leaf::dispatch("downloads", t.text("menus.downloads", &[]), Intent::ShowDownloads)
                    .checkbox(deps.current_view == CurrentView::Downloads)
                    .accelerator("CommandOrControl+D")
                    .into(),
                Leaf::new(
                    "showOnUnreadMessage",
                    t.text("menus.showOnUnreadMessage", &[]),
                    |click| Activation::Dispatch(Intent::ToggleShowWindowOnUnread(click.checked)),
                )
                .checkbox(deps.is_show_window_on_unread_changed_enabled)
                .into(),
                MenuNode::Separator,
                Leaf::new("minimize", t.text("menus.minimize", &[]), |_| {
                    Activation::Window(WindowOp::Minimize)
                })
                .accelerator("CommandOrControl+M")
                .into(),
                Leaf::new("close", t.text("menus.close", &[]), |_| Activation::Window(WindowOp::Close))
                    .accelerator("CommandOrControl+W")
                    .into(),
            ])
    }
}
