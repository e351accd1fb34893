//! # TUI Host
//!
//! Runs the menu engine against a terminal. The terminal stands in for the
//! native toolkit: `TerminalHost` receives rendered menus, `MenuBar` draws
//! them, and key presses become command activations.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ```text
//!   keys ──▶ MenuBar / accelerators ──▶ NativeMenu::activate ──▶ ActivationQueue
//!                                                                   │ Bridge (worker)
//!                                                                   │ Intent
//!   Store ◀──────────────── drain intent channel ◀──────────────────┘
//!     │ watch
//!     ▼
//!   MenuEngine (task) ──▶ TerminalHost ──▶ next frame
//! ```
//!
//! ## Redraw Strategy
//!
//! Frames are drawn only when something changed: a key was handled, an
//! intent was applied, or the host marked itself dirty (a menu was replaced,
//! a window or content target was touched). Otherwise the loop sleeps in
//! `poll` for up to 250ms.

mod component;
mod components;
mod event;
pub mod host;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use log::{debug, error, info};

use crate::core::config::ResolvedConfig;
use crate::core::i18n::Translate;
use crate::core::intent::Intent;
use crate::core::state::{CurrentView, StateSnapshot};
use crate::core::store::{SnapshotSource, Store};
use crate::menu::dispatch::{ActivationQueue, Bridge, IntentChannel};
use crate::menu::engine::MenuEngine;
use crate::menu::sink::{CommandId, NativeMenu};
use crate::tui::component::EventHandler;
use crate::tui::components::{MenuBarEvent, MenuBarState, SettingsEvent, SettingsFlags, SettingsViewState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::host::{TerminalHost, TerminalWindow};

/// TUI-specific presentation state (not part of the snapshot)
#[derive(Default)]
pub struct TuiState {
    pub menu_bar: MenuBarState,
    /// Reset whenever the settings view is left.
    pub settings: SettingsViewState,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn run(config: ResolvedConfig, translator: Arc<dyn Translate>) -> std::io::Result<()> {
    let store = Store::new(config.initial_snapshot());
    let host = Arc::new(TerminalHost::new());
    for server in &config.servers {
        host.add_content(&server.url);
    }

    let (intents, mut intent_rx) = IntentChannel::new();
    let (activations, activation_worker) = ActivationQueue::spawn(Bridge::new(host.clone(), intents.clone()));
    let mut engine = MenuEngine::new(Arc::clone(&translator)).spawn(&store, host.clone());

    let mut terminal = ratatui::init();
    host.open_window(Arc::new(TerminalWindow::new(intents.clone())));
    let mut tui = TuiState::new();
    let mut needs_redraw = true;

    let result = loop {
        let snapshot = store.snapshot();
        if snapshot.current_view != CurrentView::Settings {
            tui.settings = SettingsViewState::default();
        }

        if host.take_dirty() || needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &snapshot, &mut tui, &host, translator.as_ref())) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        let mut should_quit = false;
        for event in first_event.into_iter().chain(std::iter::from_fn(poll_event_immediate)) {
            match event {
                TuiEvent::Resize => {}
                TuiEvent::ForceQuit => should_quit = true,
                event => handle_event(&event, &snapshot, &mut tui, &host, &activations, &intents),
            }
        }

        if should_quit || host.quit_requested() {
            info!("Shutting down");
            break Ok(());
        }

        while let Ok(intent) = intent_rx.try_recv() {
            debug!("Event loop received {}", intent.kind());
            if store.dispatch(&intent) {
                needs_redraw = true;
            }
        }

        if engine.is_finished() {
            match (&mut engine).now_or_never() {
                Some(Ok(Err(e))) => {
                    error!("Menu engine failed: {}", e);
                    break Err(std::io::Error::other(e));
                }
                Some(Err(e)) => {
                    error!("Menu engine task panicked: {}", e);
                    break Err(std::io::Error::other(e));
                }
                _ => {}
            }
        }
    };

    host.close_window();
    activation_worker.abort();
    engine.abort();
    ratatui::restore();
    result
}

fn handle_event(
    event: &TuiEvent,
    snapshot: &StateSnapshot,
    tui: &mut TuiState,
    host: &TerminalHost,
    activations: &ActivationQueue,
    intents: &IntentChannel,
) {
    let menu = host.menu();

    if let Some(menu) = &menu {
        if tui.menu_bar.is_open() || matches!(event, TuiEvent::OpenMenu) {
            if let Some(MenuBarEvent::Activate(command)) = tui.menu_bar.handle_event(event, menu) {
                activate(menu, command, activations);
            }
            return;
        }
        if let TuiEvent::Shortcut(chord) = event {
            match menu.command_for_accelerator(|accel| chord.matches(accel)) {
                Some(command) => activate(menu, command, activations),
                None => debug!("No menu item for {:?}", chord),
            }
            return;
        }
    }

    if snapshot.current_view == CurrentView::Settings {
        match tui.settings.handle_event(event) {
            Some(SettingsEvent::Toggle(option)) => intents.dispatch(option.toggle(&SettingsFlags::from(snapshot))),
            Some(SettingsEvent::Close) => intents.dispatch(Intent::CloseSettings),
            None => {}
        }
    }
}

/// Run a command's handler and hand the result to the activation worker.
fn activate(menu: &NativeMenu, command: CommandId, activations: &ActivationQueue) {
    if let Some(activation) = menu.activate(command) {
        activations.push(activation);
    }
}
