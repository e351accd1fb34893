//! Menubar library exports for testing

pub mod core;
pub mod menu;
pub mod tui;

#[cfg(test)]
pub mod test_support;
