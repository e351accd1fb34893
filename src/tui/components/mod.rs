//! # TUI Components
//!
//! UI components for the terminal host.
//!
//! Both follow the persistent state + transient wrapper pattern: the state
//! struct lives in `TuiState` across frames, and a wrapper borrowing it plus
//! its props is built each frame to render.
//!
//! - `MenuBar`: the rendered native menu as a bar with drop-downs
//! - `SettingsView`: tabbed settings panel ("general", "certificates")
//!
//! Components receive external data as props, never by reaching into the
//! store. The settings panel sees translated text and a snapshot to read
//! flags from; the menu bar sees only the `NativeMenu` the engine rendered.
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── menu_bar.rs       (menu row + drop-down)
//! └── settings_view.rs  (tabs + options)
//! ```

pub mod menu_bar;
pub mod settings_view;

pub use menu_bar::{MenuBar, MenuBarEvent, MenuBarState};
pub use settings_view::{SettingsEvent, SettingsFlags, SettingsView, SettingsViewState};
