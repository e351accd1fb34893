//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::core::state::{CurrentView, Platform, Server, StateSnapshot};
use crate::menu::dispatch::ZoomLevel;
use crate::menu::sink::{AppWindow, ContentTarget, MenuHost, NativeMenu, SinkError};

/// Snapshot with servers "a" and "b", "a" selected.
pub fn two_servers(platform: Platform) -> StateSnapshot {
    let mut snapshot = StateSnapshot::new("Menubar", platform);
    snapshot.servers = vec![Server::new("a", None), Server::new("b", None)];
    snapshot.current_view = CurrentView::Server { url: "a".into() };
    snapshot
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCall {
    ShowInactive,
    Focus,
    SetFullScreen(bool),
    Minimize,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowSlot {
    Pending,
    Open,
    Closed,
}

pub struct RecordingWindow {
    visible: AtomicBool,
    calls: Mutex<Vec<WindowCall>>,
}

impl RecordingWindow {
    fn record(&self, call: WindowCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AppWindow for RecordingWindow {
    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn show_inactive(&self) {
        self.visible.store(true, Ordering::SeqCst);
        self.record(WindowCall::ShowInactive);
    }

    fn focus(&self) {
        self.record(WindowCall::Focus);
    }

    fn set_full_screen(&self, enabled: bool) {
        self.record(WindowCall::SetFullScreen(enabled));
    }

    fn minimize(&self) {
        self.record(WindowCall::Minimize);
    }

    fn close(&self) {
        self.record(WindowCall::Close);
    }
}

pub struct RecordingContent {
    zoom: Mutex<ZoomLevel>,
    reloads: AtomicUsize,
}

impl RecordingContent {
    pub fn at(level: ZoomLevel) -> Self {
        Self {
            zoom: Mutex::new(level),
            reloads: AtomicUsize::new(0),
        }
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl ContentTarget for RecordingContent {
    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }

    fn reload_ignoring_cache(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }

    fn go_back(&self) {}

    fn go_forward(&self) {}

    fn zoom_level(&self) -> ZoomLevel {
        *self.zoom.lock().unwrap()
    }

    fn set_zoom_level(&self, level: ZoomLevel) {
        *self.zoom.lock().unwrap() = level;
    }
}

/// A host that records every menu it is given.
///
/// The window can start out pending, in which case `active_window` suspends
/// until `open_window` or `close` is called.
pub struct RecordingHost {
    slot: watch::Sender<WindowSlot>,
    window: Arc<RecordingWindow>,
    contents: Mutex<HashMap<String, Arc<RecordingContent>>>,
    process_menus: Mutex<Vec<Option<NativeMenu>>>,
    window_menus: Mutex<Vec<Option<NativeMenu>>>,
    failure: Mutex<Option<SinkError>>,
    quit: AtomicBool,
}

impl RecordingHost {
    fn with_slot(slot: WindowSlot) -> Arc<Self> {
        let (slot, _rx) = watch::channel(slot);
        Arc::new(Self {
            slot,
            window: Arc::new(RecordingWindow {
                visible: AtomicBool::new(true),
                calls: Mutex::new(Vec::new()),
            }),
            contents: Mutex::new(HashMap::new()),
            process_menus: Mutex::new(Vec::new()),
            window_menus: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            quit: AtomicBool::new(false),
        })
    }

    /// Window already open and visible.
    pub fn new() -> Arc<Self> {
        Self::with_slot(WindowSlot::Open)
    }

    /// Window still being created.
    pub fn pending() -> Arc<Self> {
        Self::with_slot(WindowSlot::Pending)
    }

    pub fn open_window(&self) {
        self.slot.send_replace(WindowSlot::Open);
    }

    pub fn close(&self) {
        self.slot.send_replace(WindowSlot::Closed);
    }

    pub fn hide_window(&self) {
        self.window.visible.store(false, Ordering::SeqCst);
    }

    pub fn add_content(&self, url: &str) -> Arc<RecordingContent> {
        let content = Arc::new(RecordingContent::at(ZoomLevel::RESET));
        self.contents
            .lock()
            .unwrap()
            .insert(url.to_string(), Arc::clone(&content));
        content
    }

    /// Make every following menu call fail.
    pub fn fail_with(&self, error: SinkError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn window_calls(&self) -> Vec<WindowCall> {
        self.window.calls.lock().unwrap().clone()
    }

    pub fn process_menus(&self) -> Vec<Option<NativeMenu>> {
        self.process_menus.lock().unwrap().clone()
    }

    pub fn window_menus(&self) -> Vec<Option<NativeMenu>> {
        self.window_menus.lock().unwrap().clone()
    }

    /// Menus actually shown, whichever slot they went to.
    pub fn renders(&self) -> Vec<NativeMenu> {
        let process = self.process_menus();
        let window = self.window_menus();
        process.into_iter().chain(window).flatten().collect()
    }

    pub fn has_quit(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), SinkError> {
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MenuHost for RecordingHost {
    fn set_process_menu(&self, menu: Option<&NativeMenu>) -> Result<(), SinkError> {
        self.check_failure()?;
        self.process_menus.lock().unwrap().push(menu.cloned());
        Ok(())
    }

    fn set_window_menu(&self, _window: &dyn AppWindow, menu: Option<&NativeMenu>) -> Result<(), SinkError> {
        self.check_failure()?;
        self.window_menus.lock().unwrap().push(menu.cloned());
        Ok(())
    }

    async fn active_window(&self) -> Option<Arc<dyn AppWindow>> {
        let mut rx = self.slot.subscribe();
        let open = rx
            .wait_for(|slot| *slot != WindowSlot::Pending)
            .await
            .map(|slot| *slot == WindowSlot::Open)
            .unwrap_or(false);
        if !open {
            return None;
        }
        let window: Arc<dyn AppWindow> = self.window.clone();
        Some(window)
    }

    fn content(&self, url: &str) -> Option<Arc<dyn ContentTarget>> {
        let content: Arc<dyn ContentTarget> = self.contents.lock().unwrap().get(url).cloned()?;
        Some(content)
    }

    fn quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }
}
