//! # Terminal Host
//!
//! Plays the native side of the menu engine inside a terminal. The "window"
//! is the main view area and each configured server gets a content target
//! that tracks zoom, reloads and history movement so the UI can show them.
//!
//! The window is not available until the event loop has taken over the
//! terminal; renders and activations that arrive earlier wait for it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::watch;

use crate::core::intent::Intent;
use crate::menu::dispatch::{IntentChannel, ZoomLevel};
use crate::menu::sink::{AppWindow, ContentTarget, MenuHost, NativeMenu, SinkError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Window
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowStatus {
    pub visible: bool,
    pub focused: bool,
    pub minimized: bool,
    pub full_screen: bool,
}

pub struct TerminalWindow {
    status: Mutex<WindowStatus>,
    intents: IntentChannel,
}

impl TerminalWindow {
    pub fn new(intents: IntentChannel) -> Self {
        Self {
            status: Mutex::new(WindowStatus {
                visible: true,
                focused: true,
                ..WindowStatus::default()
            }),
            intents,
        }
    }

    pub fn status(&self) -> WindowStatus {
        *lock(&self.status)
    }
}

impl AppWindow for TerminalWindow {
    fn is_visible(&self) -> bool {
        lock(&self.status).visible
    }

    fn show_inactive(&self) {
        let mut status = lock(&self.status);
        status.visible = true;
        status.minimized = false;
    }

    fn focus(&self) {
        lock(&self.status).focused = true;
    }

    fn set_full_screen(&self, enabled: bool) {
        lock(&self.status).full_screen = enabled;
        // The window reports the transition; the menu follows the store.
        self.intents.dispatch(Intent::FullScreenChanged(enabled));
    }

    fn minimize(&self) {
        let mut status = lock(&self.status);
        status.minimized = true;
        status.visible = false;
        status.focused = false;
    }

    fn close(&self) {
        let mut status = lock(&self.status);
        status.visible = false;
        status.focused = false;
    }
}

// ============================================================================
// Content
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentStatus {
    pub zoom: ZoomLevel,
    pub reloads: u32,
    pub hard_reloads: u32,
    /// Steps back from the newest history entry.
    pub history_offset: u32,
}

#[derive(Default)]
pub struct TerminalContent {
    status: Mutex<ContentStatus>,
}

impl TerminalContent {
    pub fn status(&self) -> ContentStatus {
        *lock(&self.status)
    }
}

impl ContentTarget for TerminalContent {
    fn reload(&self) {
        lock(&self.status).reloads += 1;
    }

    fn reload_ignoring_cache(&self) {
        lock(&self.status).hard_reloads += 1;
    }

    fn go_back(&self) {
        lock(&self.status).history_offset += 1;
    }

    fn go_forward(&self) {
        let mut status = lock(&self.status);
        status.history_offset = status.history_offset.saturating_sub(1);
    }

    fn zoom_level(&self) -> ZoomLevel {
        lock(&self.status).zoom
    }

    fn set_zoom_level(&self, level: ZoomLevel) {
        lock(&self.status).zoom = level;
    }
}

// ============================================================================
// Host
// ============================================================================

enum WindowSlot {
    Pending,
    Open(Arc<TerminalWindow>),
    Closed,
}

pub struct TerminalHost {
    window: watch::Sender<WindowSlot>,
    process_menu: Mutex<Option<NativeMenu>>,
    window_menu: Mutex<Option<NativeMenu>>,
    contents: Mutex<HashMap<String, Arc<TerminalContent>>>,
    quit_requested: AtomicBool,
    dirty: AtomicBool,
}

impl TerminalHost {
    pub fn new() -> Self {
        let (window, _rx) = watch::channel(WindowSlot::Pending);
        Self {
            window,
            process_menu: Mutex::new(None),
            window_menu: Mutex::new(None),
            contents: Mutex::new(HashMap::new()),
            quit_requested: AtomicBool::new(false),
            dirty: AtomicBool::new(true),
        }
    }

    /// Make the main window available to pending and future requests.
    pub fn open_window(&self, window: Arc<TerminalWindow>) {
        info!("Main window opened");
        self.window.send_replace(WindowSlot::Open(window));
        self.mark_dirty();
    }

    /// Release anything waiting for the window. They will do nothing.
    pub fn close_window(&self) {
        info!("Main window closed");
        self.window.send_replace(WindowSlot::Closed);
    }

    pub fn window(&self) -> Option<Arc<TerminalWindow>> {
        match &*self.window.borrow() {
            WindowSlot::Open(window) => Some(Arc::clone(window)),
            _ => None,
        }
    }

    /// Register the content target for a server view.
    pub fn add_content(&self, url: &str) -> Arc<TerminalContent> {
        let mut contents = lock(&self.contents);
        let content = contents.entry(url.to_string()).or_default();
        Arc::clone(content)
    }

    pub fn content_status(&self, url: &str) -> Option<ContentStatus> {
        lock(&self.contents).get(url).map(|content| content.status())
    }

    /// The menu currently on screen, whichever slot holds it.
    pub fn menu(&self) -> Option<NativeMenu> {
        lock(&self.window_menu)
            .clone()
            .or_else(|| lock(&self.process_menu).clone())
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested.load(Ordering::SeqCst)
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// True once after anything visible changed.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MenuHost for TerminalHost {
    fn set_process_menu(&self, menu: Option<&NativeMenu>) -> Result<(), SinkError> {
        *lock(&self.process_menu) = menu.cloned();
        self.mark_dirty();
        Ok(())
    }

    fn set_window_menu(&self, _window: &dyn AppWindow, menu: Option<&NativeMenu>) -> Result<(), SinkError> {
        *lock(&self.window_menu) = menu.cloned();
        self.mark_dirty();
        Ok(())
    }

    async fn active_window(&self) -> Option<Arc<dyn AppWindow>> {
        let mut rx = self.window.subscribe();
        let window = rx
            .wait_for(|slot| !matches!(slot, WindowSlot::Pending))
            .await
            .ok()
            .and_then(|slot| match &*slot {
                WindowSlot::Open(window) => Some(Arc::clone(window)),
                _ => None,
            });
        self.mark_dirty();
        match window {
            Some(window) => Some(window),
            None => {
                debug!("No window to resolve");
                None
            }
        }
    }

    fn content(&self, url: &str) -> Option<Arc<dyn ContentTarget>> {
        let content: Arc<dyn ContentTarget> = lock(&self.contents).get(url).cloned()?;
        self.mark_dirty();
        Some(content)
    }

    fn quit(&self) {
        info!("Quit requested from menu");
        self.quit_requested.store(true, Ordering::SeqCst);
        self.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Platform;
    use crate::menu::dispatch::Bridge;
    use crate::menu::node::{Activation, ContentOp, WindowOp};
    use tokio_test::{assert_ready, task};

    fn host_with_window() -> (Arc<TerminalHost>, Arc<TerminalWindow>, tokio::sync::mpsc::UnboundedReceiver<Intent>) {
        let (intents, rx) = IntentChannel::new();
        let host = Arc::new(TerminalHost::new());
        let window = Arc::new(TerminalWindow::new(intents));
        host.open_window(Arc::clone(&window));
        (host, window, rx)
    }

    #[test]
    fn test_window_resolves_after_open() {
        let host = TerminalHost::new();
        let mut pending = task::spawn(host.active_window());
        assert!(pending.poll().is_pending());
        let (intents, _rx) = IntentChannel::new();
        host.open_window(Arc::new(TerminalWindow::new(intents)));
        assert!(assert_ready!(pending.poll()).is_some());
    }

    #[test]
    fn test_close_releases_waiters() {
        let host = TerminalHost::new();
        let mut pending = task::spawn(host.active_window());
        assert!(pending.poll().is_pending());
        host.close_window();
        assert!(assert_ready!(pending.poll()).is_none());
    }

    #[tokio::test]
    async fn test_minimized_window_is_shown_before_dispatch() {
        let (host, window, mut rx) = host_with_window();
        let bridge = Bridge::new(host.clone(), IntentChannel::new().0);
        bridge.activate(Activation::Window(WindowOp::Minimize)).await;
        assert!(!window.status().visible);
        assert!(window.status().minimized);

        let (intents, mut bridge_rx) = IntentChannel::new();
        let bridge = Bridge::new(host.clone(), intents);
        bridge.activate(Activation::Dispatch(Intent::ShowDownloads)).await;
        let status = window.status();
        assert!(status.visible && status.focused && !status.minimized);
        assert_eq!(bridge_rx.try_recv().unwrap(), Intent::ShowDownloads);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_screen_reports_back() {
        let (host, window, mut rx) = host_with_window();
        let bridge = Bridge::new(host, IntentChannel::new().0);
        bridge.activate(Activation::FullScreen(true)).await;
        assert!(window.status().full_screen);
        assert_eq!(rx.try_recv().unwrap(), Intent::FullScreenChanged(true));
    }

    #[tokio::test]
    async fn test_content_status_tracks_operations() {
        let (host, _window, _rx) = host_with_window();
        host.add_content("a");
        let bridge = Bridge::new(host.clone(), IntentChannel::new().0);
        let url = Some("a".to_string());
        for op in [ContentOp::ZoomOut, ContentOp::Reload, ContentOp::GoBack, ContentOp::GoBack, ContentOp::GoForward] {
            bridge.activate(Activation::Content { url: url.clone(), op }).await;
        }
        let status = host.content_status("a").unwrap();
        assert_eq!(status.zoom.get(), -1);
        assert_eq!(status.reloads, 1);
        assert_eq!(status.history_offset, 1);
    }

    #[tokio::test]
    async fn test_menu_slot_follows_platform() {
        use crate::menu::compose::{Fragment, compose, Capabilities};
        let (host, _window, _rx) = host_with_window();
        let tree = compose(
            &[Fragment::new("viewMenu", "&View")],
            &Capabilities { platform: Platform::Linux, add_new_servers: true },
        )
        .unwrap();
        crate::menu::sink::render(host.as_ref(), Platform::Linux, &tree).await.unwrap();
        assert!(lock(&host.process_menu).is_none());
        assert_eq!(host.menu().unwrap().items[0].label, "&View");
        assert!(host.take_dirty());
        assert!(!host.take_dirty());
    }
}
