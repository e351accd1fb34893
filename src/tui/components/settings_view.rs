//! # SettingsView Component
//!
//! Tabbed settings panel with two sections, "general" and "certificates".
//! Which tab is showing is local UI state: it never reaches the store and
//! resets whenever the panel is closed.
//!
//! The panel only reads translated text and the flags it displays. Toggling
//! an option emits a `SettingsEvent`; the event loop turns that into an
//! intent.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Tabs};

use crate::core::i18n::Translate;
use crate::core::intent::Intent;
use crate::core::state::StateSnapshot;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    General,
    Certificates,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 2] = [SettingsTab::General, SettingsTab::Certificates];

    /// Stable identifier of the section.
    pub fn id(self) -> &'static str {
        match self {
            SettingsTab::General => "general",
            SettingsTab::Certificates => "certificates",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            SettingsTab::General => "settings.general",
            SettingsTab::Certificates => "settings.certificates",
        }
    }

    fn index(self) -> usize {
        match self {
            SettingsTab::General => 0,
            SettingsTab::Certificates => 1,
        }
    }

    fn other(self) -> Self {
        match self {
            SettingsTab::General => SettingsTab::Certificates,
            SettingsTab::Certificates => SettingsTab::General,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOption {
    TrayIcon,
    SideBar,
    MenuBar,
    ShowOnUnread,
}

impl SettingsOption {
    pub const ALL: [SettingsOption; 4] = [
        SettingsOption::TrayIcon,
        SettingsOption::SideBar,
        SettingsOption::MenuBar,
        SettingsOption::ShowOnUnread,
    ];

    fn label_key(self) -> &'static str {
        match self {
            SettingsOption::TrayIcon => "settings.options.trayIcon",
            SettingsOption::SideBar => "settings.options.sideBar",
            SettingsOption::MenuBar => "settings.options.menuBar",
            SettingsOption::ShowOnUnread => "settings.options.showOnUnread",
        }
    }

    pub fn is_enabled(self, flags: &SettingsFlags) -> bool {
        match self {
            SettingsOption::TrayIcon => flags.tray_icon,
            SettingsOption::SideBar => flags.side_bar,
            SettingsOption::MenuBar => flags.menu_bar,
            SettingsOption::ShowOnUnread => flags.show_on_unread,
        }
    }

    /// The intent that flips this option.
    pub fn toggle(self, flags: &SettingsFlags) -> Intent {
        let enabled = !self.is_enabled(flags);
        match self {
            SettingsOption::TrayIcon => Intent::ToggleTrayIcon(enabled),
            SettingsOption::SideBar => Intent::ToggleSideBar(enabled),
            SettingsOption::MenuBar => Intent::ToggleMenuBar(enabled),
            SettingsOption::ShowOnUnread => Intent::ToggleShowWindowOnUnread(enabled),
        }
    }
}

/// The option flags the panel displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsFlags {
    pub tray_icon: bool,
    pub side_bar: bool,
    pub menu_bar: bool,
    pub show_on_unread: bool,
}

impl From<&StateSnapshot> for SettingsFlags {
    fn from(snapshot: &StateSnapshot) -> Self {
        Self {
            tray_icon: snapshot.is_tray_icon_enabled,
            side_bar: snapshot.is_side_bar_enabled,
            menu_bar: snapshot.is_menu_bar_enabled,
            show_on_unread: snapshot.is_show_window_on_unread_changed_enabled,
        }
    }
}

/// Persistent (but ephemeral) state for the settings panel.
#[derive(Debug, Default)]
pub struct SettingsViewState {
    pub tab: SettingsTab,
    pub selected: usize,
}

/// Events emitted by the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    Toggle(SettingsOption),
    Close,
}

impl EventHandler for SettingsViewState {
    type Event = SettingsEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<SettingsEvent> {
        match event {
            TuiEvent::Escape => Some(SettingsEvent::Close),
            TuiEvent::NextTab | TuiEvent::PrevTab | TuiEvent::CursorLeft | TuiEvent::CursorRight => {
                self.tab = self.tab.other();
                self.selected = 0;
                None
            }
            TuiEvent::CursorUp if self.tab == SettingsTab::General => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown if self.tab == SettingsTab::General => {
                self.selected = (self.selected + 1).min(SettingsOption::ALL.len() - 1);
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') if self.tab == SettingsTab::General => {
                SettingsOption::ALL
                    .get(self.selected)
                    .map(|option| SettingsEvent::Toggle(*option))
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the settings panel.
pub struct SettingsView<'a> {
    state: &'a SettingsViewState,
    t: &'a dyn Translate,
    flags: SettingsFlags,
}

impl<'a> SettingsView<'a> {
    pub fn new(state: &'a SettingsViewState, t: &'a dyn Translate, flags: SettingsFlags) -> Self {
        Self { state, t, flags }
    }

    fn general_lines(&self) -> Vec<Line<'static>> {
        SettingsOption::ALL
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let mark = if option.is_enabled(&self.flags) { "[x]" } else { "[ ]" };
                let text = format!("{} {}", mark, self.t.text(option.label_key(), &[]));
                let style = if i == self.state.selected {
                    Style::default().fg(Color::White).add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::styled(text, style)
            })
            .collect()
    }
}

impl Component for SettingsView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        use Constraint::{Length, Min};
        let [title_area, tabs_area, body_area] = Layout::vertical([Length(2), Length(2), Min(0)]).areas(area);

        let title = Paragraph::new(self.t.text("settings.title", &[]))
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(title, title_area);

        let titles: Vec<String> = SettingsTab::ALL
            .iter()
            .map(|tab| self.t.text(tab.label_key(), &[]))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.state.tab.index())
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(tabs, tabs_area);

        let body = match self.state.tab {
            SettingsTab::General => self.general_lines(),
            SettingsTab::Certificates => vec![Line::styled(
                self.t.text("settings.certificates.empty", &[]),
                Style::default().fg(Color::DarkGray),
            )],
        };
        let hint = self.t.text("settings.hint", &[]);
        let block = Block::default()
            .padding(Padding::horizontal(1))
            .title_bottom(Line::from(hint).centered());
        frame.render_widget(Paragraph::new(body).block(block), body_area);
    }
}
