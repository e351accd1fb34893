//! # Menu Engine
//!
//! Ties the pipeline together and owns everything that persists between
//! snapshots: the memoized derivations and the change detector.
//!
//! ```text
//! watch::Receiver ──▶ borrow latest ──▶ project ──▶ should_apply? ──yes──▶ render().await
//!        ▲                                               │ no                 │
//!        └───────────────── changed().await ◀────────────┴────────────────────┘
//! ```
//!
//! Snapshots that arrive while a render is waiting for the window are not
//! queued. The watch channel keeps only the newest, so the next pass
//! projects whatever the state is by then.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::i18n::Translate;
use crate::core::state::StateSnapshot;
use crate::core::store::SnapshotSource;
use crate::menu::compose::{Capabilities, CompositionError, compose};
use crate::menu::derive::{AppMenu, Memo, ViewMenu, WindowMenu};
use crate::menu::fingerprint::ChangeDetector;
use crate::menu::node::MenuNode;
use crate::menu::sink::{MenuHost, SinkError, render};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Composition(CompositionError),
    Sink(SinkError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Composition(e) => write!(f, "menu composition failed: {e}"),
            EngineError::Sink(e) => write!(f, "menu render failed: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Composition(e) => Some(e),
            EngineError::Sink(e) => Some(e),
        }
    }
}

impl From<CompositionError> for EngineError {
    fn from(e: CompositionError) -> Self {
        EngineError::Composition(e)
    }
}

impl From<SinkError> for EngineError {
    fn from(e: SinkError) -> Self {
        EngineError::Sink(e)
    }
}

pub struct MenuEngine {
    translator: Arc<dyn Translate>,
    app_menu: Memo<AppMenu>,
    view_menu: Memo<ViewMenu>,
    window_menu: Memo<WindowMenu>,
    detector: ChangeDetector,
}

impl MenuEngine {
    pub fn new(translator: Arc<dyn Translate>) -> Self {
        Self {
            translator,
            app_menu: Memo::new(),
            view_menu: Memo::new(),
            window_menu: Memo::new(),
            detector: ChangeDetector::new(),
        }
    }

    /// Derive and compose the full tree for `snapshot`.
    pub fn project(&mut self, snapshot: &StateSnapshot) -> Result<MenuNode, CompositionError> {
        let t = self.translator.as_ref();
        let fragments = [
            self.app_menu.get(snapshot, t),
            self.view_menu.get(snapshot, t),
            self.window_menu.get(snapshot, t),
        ];
        compose(&fragments, &Capabilities::of(snapshot))
    }

    /// Project `snapshot` and return the tree only if it needs rendering.
    pub fn on_snapshot(&mut self, snapshot: &StateSnapshot) -> Result<Option<MenuNode>, CompositionError> {
        let tree = self.project(snapshot)?;
        if self.detector.should_apply(&tree) {
            Ok(Some(tree))
        } else {
            debug!("Menu unchanged at version {}", snapshot.version);
            Ok(None)
        }
    }

    /// Total derivation runs across all menus.
    pub fn recomputations(&self) -> usize {
        self.app_menu.recomputations() + self.view_menu.recomputations() + self.window_menu.recomputations()
    }

    /// Keep the host's menu in sync until the snapshot source goes away.
    pub async fn run(
        mut self,
        mut snapshots: watch::Receiver<Arc<StateSnapshot>>,
        host: Arc<dyn MenuHost>,
    ) -> Result<(), EngineError> {
        info!("Menu engine started");
        loop {
            let snapshot = Arc::clone(&snapshots.borrow_and_update());
            if let Some(tree) = self.on_snapshot(&snapshot)? {
                render(host.as_ref(), snapshot.platform, &tree).await?;
            }
            if snapshots.changed().await.is_err() {
                info!("Snapshot source closed, menu engine stopping");
                return Ok(());
            }
        }
    }

    pub fn spawn(self, source: &dyn SnapshotSource, host: Arc<dyn MenuHost>) -> JoinHandle<Result<(), EngineError>> {
        tokio::spawn(self.run(source.subscribe(), host))
    }
}
