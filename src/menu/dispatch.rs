//! # Action Dispatch
//!
//! Carries out what a clicked leaf asked for. Every activation except quit
//! runs inside [`Bridge::with_focused_window`]:
//!
//! ```text
//! active_window().await ──None──▶ (nothing happens)
//!        │
//!        ▼
//!   is_visible? ──no──▶ show_inactive()
//!        │                    │
//!        ▼                    ▼
//!     focus() ◀───────────────┘
//!        │
//!        ▼
//!   perform: send intent │ content op │ window op
//! ```
//!
//! The only suspension point is resolving the window. Intents go to the
//! store through an [`IntentChannel`]; the bridge never touches state,
//! derivation or rendering itself.
//!
//! Hosts that click from a UI thread push into an [`ActivationQueue`]. One
//! worker task drains it, so activations run one at a time in click order.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::intent::Intent;
use crate::menu::node::{Activation, ContentOp, Leaf, WindowOp};
use crate::menu::sink::{AppWindow, ContentTarget, MenuHost};

/// Zoom level of a content target, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ZoomLevel(i8);

impl ZoomLevel {
    pub const MIN: i8 = -9;
    pub const MAX: i8 = 9;
    pub const RESET: ZoomLevel = ZoomLevel(0);

    /// Out-of-range values are clamped.
    pub fn new(level: i8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> i8 {
        self.0
    }

    /// One step in. Saturates at `MAX`.
    pub fn zoom_in(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// One step out. Saturates at `MIN`.
    pub fn zoom_out(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

/// Sending half of the intent queue. The receiver lives with the store.
#[derive(Debug, Clone)]
pub struct IntentChannel {
    tx: mpsc::UnboundedSender<Intent>,
}

impl IntentChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Intent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn dispatch(&self, intent: Intent) {
        debug!("Dispatching {}", intent.kind());
        if self.tx.send(intent).is_err() {
            warn!("Intent dropped: store is gone");
        }
    }
}

pub struct Bridge {
    host: Arc<dyn MenuHost>,
    intents: IntentChannel,
}

impl Bridge {
    pub fn new(host: Arc<dyn MenuHost>, intents: IntentChannel) -> Self {
        Self { host, intents }
    }

    /// Click `leaf` the way a native menu would and carry out the result.
    pub async fn activate_leaf(&self, leaf: &Leaf) {
        if !leaf.enabled {
            return;
        }
        self.activate(leaf.activate(&leaf.click())).await;
    }

    pub async fn activate(&self, activation: Activation) {
        match activation {
            Activation::Quit => self.host.quit(),
            Activation::Dispatch(intent) => {
                self.with_focused_window(|_| self.intents.dispatch(intent)).await;
            }
            Activation::FullScreen(enabled) => {
                self.with_focused_window(|window| window.set_full_screen(enabled))
                    .await;
            }
            Activation::Window(op) => {
                self.with_focused_window(|window| match op {
                    WindowOp::Minimize => window.minimize(),
                    WindowOp::Close => window.close(),
                })
                .await;
            }
            Activation::Content { url, op } => {
                self.with_focused_window(|_| {
                    let target = url.as_deref().and_then(|url| self.host.content(url));
                    match target {
                        Some(target) => apply_content_op(target.as_ref(), op),
                        None => debug!("No content target for {:?}, ignoring", op),
                    }
                })
                .await;
            }
        }
    }

    /// Resolve the window, make sure it is shown and focused, then run
    /// `action`. Returns `None` if the window went away first.
    pub async fn with_focused_window<R>(&self, action: impl FnOnce(&dyn AppWindow) -> R) -> Option<R> {
        let Some(window) = self.host.active_window().await else {
            debug!("Window closed before activation, dropping it");
            return None;
        };
        if !window.is_visible() {
            window.show_inactive();
        }
        window.focus();
        Some(action(window.as_ref()))
    }
}

/// Handle to the activation worker. Cloning shares the same worker.
#[derive(Debug, Clone)]
pub struct ActivationQueue {
    tx: mpsc::UnboundedSender<Activation>,
}

impl ActivationQueue {
    /// Start the worker that owns `bridge`. It exits once every queue
    /// handle is dropped and the backlog is drained.
    pub fn spawn(bridge: Bridge) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Activation>();
        let worker = tokio::spawn(async move {
            while let Some(activation) = rx.recv().await {
                bridge.activate(activation).await;
            }
            debug!("Activation queue closed");
        });
        (Self { tx }, worker)
    }

    pub fn push(&self, activation: Activation) {
        debug!("Queueing activation {:?}", activation);
        if self.tx.send(activation).is_err() {
            warn!("Activation dropped: worker is gone");
        }
    }
}

pub fn apply_content_op(target: &dyn ContentTarget, op: ContentOp) {
    match op {
        ContentOp::Reload => target.reload(),
        ContentOp::ReloadIgnoringCache => target.reload_ignoring_cache(),
        ContentOp::GoBack => target.go_back(),
        ContentOp::GoForward => target.go_forward(),
        ContentOp::ResetZoom => target.set_zoom_level(ZoomLevel::RESET),
        ContentOp::ZoomIn => target.set_zoom_level(target.zoom_level().zoom_in()),
        ContentOp::ZoomOut => target.set_zoom_level(target.zoom_level().zoom_out()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingHost, WindowCall};
    use tokio_test::{assert_pending, assert_ready, task};

    fn bridge(host: &Arc<RecordingHost>) -> (Bridge, mpsc::UnboundedReceiver<Intent>) {
        let (intents, rx) = IntentChannel::new();
        let host: Arc<dyn MenuHost> = host.clone();
        (Bridge::new(host, intents), rx)
    }

    #[test]
    fn test_zoom_clamps_at_bounds() {
        let mut level = ZoomLevel::new(9);
        for _ in 0..5 {
            level = level.zoom_in();
        }
        assert_eq!(level.get(), 9);

        let mut level = ZoomLevel::new(-9);
        for _ in 0..5 {
            level = level.zoom_out();
        }
        assert_eq!(level.get(), -9);

        assert_eq!(ZoomLevel::new(100).get(), 9);
        assert_eq!(ZoomLevel::new(i8::MIN).get(), -9);
    }

    #[test]
    fn test_reset_from_any_level() {
        for level in ZoomLevel::MIN..=ZoomLevel::MAX {
            let target = crate::test_support::RecordingContent::at(ZoomLevel::new(level));
            apply_content_op(&target, ContentOp::ResetZoom);
            assert_eq!(target.zoom_level().get(), 0);
        }
    }

    #[tokio::test]
    async fn test_dispatch_focuses_window_first() {
        let host = RecordingHost::new();
        host.hide_window();
        let (bridge, mut rx) = bridge(&host);

        bridge.activate(Activation::Dispatch(Intent::ShowDownloads)).await;

        assert_eq!(rx.try_recv().unwrap(), Intent::ShowDownloads);
        assert!(rx.try_recv().is_err());
        assert_eq!(host.window_calls(), vec![WindowCall::ShowInactive, WindowCall::Focus]);
    }

    #[tokio::test]
    async fn test_visible_window_is_only_focused() {
        let host = RecordingHost::new();
        let (bridge, _rx) = bridge(&host);
        bridge.activate(Activation::Window(WindowOp::Minimize)).await;
        assert_eq!(host.window_calls(), vec![WindowCall::Focus, WindowCall::Minimize]);
    }

    #[tokio::test]
    async fn test_content_ops_reach_target() {
        let host = RecordingHost::new();
        let content = host.add_content("a");
        let (bridge, _rx) = bridge(&host);
        let url = Some("a".to_string());

        bridge.activate(Activation::Content { url: url.clone(), op: ContentOp::ZoomIn }).await;
        bridge.activate(Activation::Content { url: url.clone(), op: ContentOp::ZoomIn }).await;
        bridge.activate(Activation::Content { url: url.clone(), op: ContentOp::Reload }).await;
        assert_eq!(content.zoom_level().get(), 2);
        assert_eq!(content.reloads(), 1);

        bridge.activate(Activation::Content { url, op: ContentOp::ResetZoom }).await;
        assert_eq!(content.zoom_level().get(), 0);
    }

    #[tokio::test]
    async fn test_missing_content_target_is_a_no_op() {
        let host = RecordingHost::new();
        let (bridge, mut rx) = bridge(&host);
        bridge.activate(Activation::Content { url: None, op: ContentOp::ZoomIn }).await;
        bridge
            .activate(Activation::Content { url: Some("gone".into()), op: ContentOp::GoBack })
            .await;
        assert!(rx.try_recv().is_err());
        // The window is still brought forward.
        assert_eq!(host.window_calls(), vec![WindowCall::Focus, WindowCall::Focus]);
    }

    #[tokio::test]
    async fn test_quit_skips_window() {
        let host = RecordingHost::pending();
        let (bridge, _rx) = bridge(&host);
        bridge.activate(Activation::Quit).await;
        assert!(host.has_quit());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_queued_activations_keep_click_order() {
        let host = RecordingHost::pending();
        let (bridge, mut rx) = bridge(&host);
        let (queue, worker) = ActivationQueue::spawn(bridge);

        let clicks: Vec<Intent> = (0..8).map(|i| Intent::SelectServer(format!("s{i}"))).collect();
        for intent in &clicks {
            queue.push(Activation::Dispatch(intent.clone()));
        }
        host.open_window();
        drop(queue);
        worker.await.unwrap();

        let mut received = Vec::new();
        while let Ok(intent) = rx.try_recv() {
            received.push(intent);
        }
        assert_eq!(received, clicks);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_queued_zoom_steps_all_apply() {
        let host = RecordingHost::new();
        let content = host.add_content("a");
        let (bridge, _rx) = bridge(&host);
        let (queue, worker) = ActivationQueue::spawn(bridge);

        for _ in 0..6 {
            queue.push(Activation::Content { url: Some("a".into()), op: ContentOp::ZoomIn });
        }
        queue.push(Activation::Content { url: Some("a".into()), op: ContentOp::ZoomOut });
        drop(queue);
        worker.await.unwrap();

        assert_eq!(content.zoom_level().get(), 5);
    }

    #[test]
    fn test_activation_waits_for_window() {
        let host = RecordingHost::pending();
        let (bridge, mut rx) = bridge(&host);

        let mut activation = task::spawn(bridge.activate(Activation::Dispatch(Intent::OpenSettings)));
        assert_pending!(activation.poll());
        assert!(rx.try_recv().is_err());

        host.open_window();
        assert!(activation.is_woken());
        assert_ready!(activation.poll());
        assert_eq!(rx.try_recv().unwrap(), Intent::OpenSettings);
    }

    #[test]
    fn test_window_closed_before_resolution_drops_activation() {
        let host = RecordingHost::pending();
        let (bridge, mut rx) = bridge(&host);

        let mut activation = task::spawn(bridge.activate(Activation::Dispatch(Intent::OpenSettings)));
        assert_pending!(activation.poll());
        host.close();
        assert_ready!(activation.poll());
        assert!(rx.try_recv().is_err());
        assert!(host.window_calls().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_leaf_does_nothing() {
        let host = RecordingHost::new();
        let (bridge, mut rx) = bridge(&host);
        let leaf = Leaf::dispatch("downloads", "Downloads", Intent::ShowDownloads).enabled(false);
        bridge.activate_leaf(&leaf).await;
        assert!(rx.try_recv().is_err());
        assert!(host.window_calls().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_leaf_sends_flipped_state_once() {
        let host = RecordingHost::new();
        let (bridge, mut rx) = bridge(&host);
        let leaf = Leaf::new("showTrayIcon", "Tray", |c| {
            Activation::Dispatch(Intent::ToggleTrayIcon(c.checked))
        })
        .checkbox(false);
        bridge.activate_leaf(&leaf).await;
        assert_eq!(rx.try_recv().unwrap(), Intent::ToggleTrayIcon(true));
        assert!(rx.try_recv().is_err());
    }
}
