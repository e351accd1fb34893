//! # MenuBar Component
//!
//! Draws the rendered `NativeMenu` as a one-row bar with a drop-down for the
//! open submenu. F10 opens it, arrows move, Enter activates, Esc closes.
//! Typing a mnemonic letter activates the matching item.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `MenuBarState` lives in `TuiState`
//! - `MenuBar` is created each frame with borrowed state and the current menu
//!
//! The menu can be replaced while it is open. Indices are clamped against
//! whatever menu is current instead of being tracked across renders.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::i18n::strip_mnemonic;
use crate::core::state::Platform;
use crate::menu::sink::{CommandId, NativeItem, NativeItemKind, NativeMenu};
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

/// Persistent state for the menu bar.
#[derive(Debug, Default)]
pub struct MenuBarState {
    /// Index of the open top-level menu.
    pub open: Option<usize>,
    /// Index of the highlighted item inside the open menu.
    pub selected: usize,
}

/// Events emitted by the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuBarEvent {
    Activate(CommandId),
    Closed,
}

impl MenuBarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn close(&mut self) {
        self.open = None;
        self.selected = 0;
    }

    fn open_at(&mut self, index: usize, menu: &NativeMenu) {
        self.open = Some(index);
        self.selected = first_selectable(items_of(menu, index)).unwrap_or(0);
    }

    /// Handle a key event while the menu is open, or F10 while it is closed.
    pub fn handle_event(&mut self, event: &TuiEvent, menu: &NativeMenu) -> Option<MenuBarEvent> {
        let count = menu.items.len();
        let Some(open) = self.open else {
            if matches!(event, TuiEvent::OpenMenu) && count > 0 {
                self.open_at(0, menu);
            }
            return None;
        };
        if count == 0 {
            self.close();
            return Some(MenuBarEvent::Closed);
        }
        let open = open.min(count - 1);
        let items = items_of(menu, open);

        match event {
            TuiEvent::OpenMenu | TuiEvent::Escape => {
                self.close();
                Some(MenuBarEvent::Closed)
            }
            TuiEvent::CursorLeft => {
                self.open_at((open + count - 1) % count, menu);
                None
            }
            TuiEvent::CursorRight => {
                self.open_at((open + 1) % count, menu);
                None
            }
            TuiEvent::CursorUp => {
                self.selected = step(items, self.selected, false);
                None
            }
            TuiEvent::CursorDown => {
                self.selected = step(items, self.selected, true);
                None
            }
            TuiEvent::Submit => self.activate(items.get(self.selected)),
            TuiEvent::InputChar(c) => {
                let item = items
                    .iter()
                    .find(|item| mnemonic(&item.label) == Some(c.to_ascii_lowercase()));
                self.activate(item)
            }
            _ => None,
        }
    }

    fn activate(&mut self, item: Option<&NativeItem>) -> Option<MenuBarEvent> {
        let item = item.filter(|item| item.enabled)?;
        let command = item.command?;
        self.close();
        Some(MenuBarEvent::Activate(command))
    }
}

fn items_of(menu: &NativeMenu, index: usize) -> &[NativeItem] {
    menu.items.get(index).map(NativeItem::children).unwrap_or(&[])
}

fn first_selectable(items: &[NativeItem]) -> Option<usize> {
    items.iter().position(|item| !item.is_separator())
}

/// Next non-separator index in the given direction, wrapping around.
fn step(items: &[NativeItem], from: usize, forward: bool) -> usize {
    let len = items.len();
    if len == 0 {
        return 0;
    }
    let mut index = from.min(len - 1);
    for _ in 0..len {
        index = if forward { (index + 1) % len } else { (index + len - 1) % len };
        if !items[index].is_separator() {
            return index;
        }
    }
    from
}

/// The letter after a single `&`, lowercased.
fn mnemonic(label: &str) -> Option<char> {
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        if c == '&' {
            match chars.next() {
                Some('&') => continue,
                Some(next) => return Some(next.to_ascii_lowercase()),
                None => return None,
            }
        }
    }
    None
}

/// Accelerator text as shown next to an item.
pub fn display_accelerator(accelerator: &str, platform: Platform) -> String {
    let command = if platform.is_mac() { "Cmd" } else { "Ctrl" };
    accelerator
        .replace("CommandOrControl", command)
        .replace("Command", "Cmd")
        .replace("Control", "Ctrl")
        .replace("Plus", "+")
}

/// Transient render wrapper for the menu bar and its open drop-down.
///
/// `area` is the whole frame: the bar takes its first row and the drop-down
/// is drawn over whatever is below.
pub struct MenuBar<'a> {
    state: &'a mut MenuBarState,
    menu: &'a NativeMenu,
    platform: Platform,
}

impl<'a> MenuBar<'a> {
    pub fn new(state: &'a mut MenuBarState, menu: &'a NativeMenu, platform: Platform) -> Self {
        Self { state, menu, platform }
    }

    fn render_dropdown(&self, frame: &mut Frame, area: Rect, x: u16, items: &[NativeItem]) {
        let accelerators: Vec<String> = items
            .iter()
            .map(|item| {
                item.accelerator
                    .as_deref()
                    .map(|a| display_accelerator(a, self.platform))
                    .unwrap_or_default()
            })
            .collect();
        let labels: Vec<String> = items.iter().map(|item| strip_mnemonic(&item.label)).collect();

        let label_width = labels.iter().map(|l| l.width()).max().unwrap_or(0);
        let accel_width = accelerators.iter().map(|a| a.width()).max().unwrap_or(0);
        // check mark + label + gap + accelerator, plus borders
        let inner = (2 + label_width + 3 + accel_width) as u16;
        let width = (inner + 2).min(area.width.saturating_sub(x.saturating_sub(area.x)));
        let height = (items.len() as u16 + 2).min(area.height.saturating_sub(1));
        let dropdown = Rect::new(x, area.y + 1, width, height);

        let lines: Vec<Line> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if item.is_separator() {
                    return Line::styled(
                        "─".repeat(inner as usize),
                        Style::default().fg(Color::DarkGray),
                    );
                }
                let mark = match item.kind {
                    NativeItemKind::Checkbox { checked: true } => "✓ ",
                    NativeItemKind::Submenu(_) => "▸ ",
                    _ => "  ",
                };
                let padded = format!("{:<width$}", labels[i], width = label_width);
                let style = if !item.enabled {
                    Style::default().fg(Color::DarkGray)
                } else if i == self.state.selected {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(vec![
                    Span::styled(mark, style),
                    Span::styled(padded, style),
                    Span::styled("   ", style),
                    Span::styled(format!("{:>width$}", accelerators[i], width = accel_width), style),
                ])
            })
            .collect();

        frame.render_widget(Clear, dropdown);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(lines).block(block), dropdown);
    }
}

impl Component for MenuBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let count = self.menu.items.len();
        if count == 0 {
            self.state.close();
        }
        let open = self.state.open.map(|open| open.min(count.saturating_sub(1)));

        let mut spans = Vec::new();
        let mut x = area.x;
        let mut open_x = area.x;
        for (i, item) in self.menu.items.iter().enumerate() {
            let title = format!(" {} ", strip_mnemonic(&item.label));
            let style = if open == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Gray)
            } else {
                Style::default().fg(Color::Gray)
            };
            if open == Some(i) {
                open_x = x;
            }
            x += title.width() as u16;
            spans.push(Span::styled(title, style));
        }
        let bar = Rect::new(area.x, area.y, area.width, 1);
        frame.render_widget(Clear, bar);
        frame.render_widget(Paragraph::new(Line::from(spans)), bar);

        if let Some(open) = open {
            let items = items_of(self.menu, open);
            if !items.is_empty() {
                self.state.selected = self.state.selected.min(items.len() - 1);
                self.render_dropdown(frame, area, open_x, items);
            }
        }
    }
}
