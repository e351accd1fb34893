//! # Core Application Logic
//!
//! Application state and the ways it can change. It knows nothing about
//! menus or terminals.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • StateSnapshot        │
//!                    │  • Intent + update()    │
//!                    │  • Store (publishes)    │
//!                    │                         │
//!                    └───────────┬─────────────┘
//!                                │ watch::Receiver<Arc<StateSnapshot>>
//!                                ▼
//!                    ┌─────────────────────────┐
//!                    │          MENU           │
//!                    │  derive → compose →     │
//!                    │  fingerprint → render   │
//!                    └───────────┬─────────────┘
//!                                │ Intent (mpsc)
//!                                ▼
//!                           back to Store
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `StateSnapshot` and the domain types inside it
//! - [`intent`]: the `Intent` enum and the `update()` reducer
//! - [`store`]: `SnapshotSource` and the reference `Store`
//! - [`config`]: layered configuration that seeds the first snapshot
//! - [`i18n`]: the `Translate` seam and the built-in English catalog

pub mod config;
pub mod i18n;
pub mod intent;
pub mod state;
pub mod store;
