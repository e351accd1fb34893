//! # Menu Projection
//!
//! Turns state snapshots into a native menu and turns clicks back into
//! intents. Nothing in here mutates application state.
//!
//! ```text
//!   StateSnapshot
//!        │
//!        ▼
//!   derive (AppMenu, ViewMenu, WindowMenu)   memoized per Deps
//!        │ Fragment × 3
//!        ▼
//!   compose                                  platform/feature blocks resolved
//!        │ MenuNode
//!        ▼
//!   ChangeDetector::should_apply             fingerprint vs last applied
//!        │ changed
//!        ▼
//!   render → MenuHost                        one atomic replace
//!        ·
//!        · user clicks
//!        ▼
//!   Bridge::activate                         window → focus → Intent
//! ```
//!
//! ## Modules
//!
//! - [`node`]: the declarative tree and the pure click handlers
//! - [`derive`]: the three derivations and their memoization
//! - [`compose`]: predicate-tagged blocks and the composer
//! - [`fingerprint`]: canonical form and change detection
//! - [`sink`]: the `MenuHost` seam and `render`
//! - [`dispatch`]: the activation bridge and zoom levels
//! - [`engine`]: the loop that drives all of the above

pub mod compose;
pub mod derive;
pub mod dispatch;
pub mod engine;
pub mod fingerprint;
pub mod node;
pub mod sink;

pub use dispatch::{ActivationQueue, Bridge, IntentChannel, ZoomLevel};
pub use engine::{EngineError, MenuEngine};
pub use node::{Activation, MenuNode};
pub use sink::{AppWindow, ContentTarget, MenuHost, NativeMenu, SinkError};
