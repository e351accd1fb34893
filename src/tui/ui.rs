use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::core::i18n::Translate;
use crate::core::state::{CurrentView, StateSnapshot};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MenuBar, SettingsFlags, SettingsView};
use crate::tui::host::TerminalHost;

const SIDE_BAR_WIDTH: u16 = 24;

/// Whether the menu row takes up space in the layout.
fn menu_row_visible(snapshot: &StateSnapshot, tui: &TuiState) -> bool {
    snapshot.platform.has_global_menu() || snapshot.is_menu_bar_enabled || tui.menu_bar.is_open()
}

pub fn draw_ui(frame: &mut Frame, snapshot: &StateSnapshot, tui: &mut TuiState, host: &TerminalHost, t: &dyn Translate) {
    use Constraint::{Length, Min};
    let menu_rows = if menu_row_visible(snapshot, tui) { 1 } else { 0 };
    let area = frame.area();
    let [_menu_area, body_area, status_area] = Layout::vertical([Length(menu_rows), Min(0), Length(1)]).areas(area);

    let window_visible = host.window().map(|w| w.status().visible).unwrap_or(false);

    let main_area = if snapshot.is_side_bar_enabled && window_visible {
        let [side_area, main_area] = Layout::horizontal([Length(SIDE_BAR_WIDTH), Min(0)]).areas(body_area);
        draw_side_bar(frame, side_area, snapshot);
        main_area
    } else {
        body_area
    };

    if window_visible {
        draw_main_view(frame, main_area, snapshot, tui, host, t);
    } else {
        draw_message(frame, main_area, &t.text("views.hidden", &[]));
    }

    draw_status_line(frame, status_area, snapshot, host);

    // Drawn last so the drop-down overlays the views.
    if menu_rows > 0
        && let Some(menu) = host.menu()
    {
        MenuBar::new(&mut tui.menu_bar, &menu, snapshot.platform).render(frame, area);
    }
}

fn draw_side_bar(frame: &mut Frame, area: Rect, snapshot: &StateSnapshot) {
    let current = snapshot.current_view.server_url();
    let items: Vec<ListItem> = snapshot
        .servers
        .iter()
        .map(|server| {
            let name = server.title.as_deref().unwrap_or(&server.url);
            let style = if current == Some(server.url.as_str()) {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Line::styled(name.to_string(), style))
        })
        .collect();
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_main_view(
    frame: &mut Frame,
    area: Rect,
    snapshot: &StateSnapshot,
    tui: &mut TuiState,
    host: &TerminalHost,
    t: &dyn Translate,
) {
    match &snapshot.current_view {
        CurrentView::AddNewServer => draw_message(frame, area, &t.text("views.addNewServer", &[])),
        CurrentView::Downloads => draw_message(frame, area, &t.text("views.downloads", &[])),
        CurrentView::Settings => {
            SettingsView::new(&tui.settings, t, SettingsFlags::from(snapshot)).render(frame, area);
        }
        CurrentView::Server { url } => {
            let mut lines = vec![Line::from(t.text("views.server", &[("url", url)]))];
            if let Some(status) = host.content_status(url) {
                lines.push(Line::styled(
                    format!(
                        "zoom {:+}  reloads {}  hard reloads {}  history -{}",
                        status.zoom.get(),
                        status.reloads,
                        status.hard_reloads,
                        status.history_offset
                    ),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered_row(area, 2));
        }
    }
}

fn draw_message(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, centered_row(area, 1));
}

fn draw_status_line(frame: &mut Frame, area: Rect, snapshot: &StateSnapshot, host: &TerminalHost) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", snapshot.app_name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("| {} | v{}", snapshot.platform, snapshot.version)),
    ];
    if snapshot.is_tray_icon_enabled {
        spans.push(Span::raw(" | tray"));
    }
    if snapshot.root_window_state.fullscreen {
        spans.push(Span::raw(" | full screen"));
    }
    if let Some(window) = host.window()
        && window.status().minimized
    {
        spans.push(Span::raw(" | minimized"));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::Gray)),
        area,
    );
}

/// A band of `height` rows in the vertical middle of `area`.
fn centered_row(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect::new(area.x, area.y + (area.height - height) / 2, area.width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::i18n::Catalog;
    use crate::core::state::Platform;
    use crate::menu::dispatch::IntentChannel;
    use crate::menu::engine::MenuEngine;
    use crate::menu::sink::{MenuHost, NativeMenu};
    use crate::test_support::two_servers;
    use crate::tui::host::TerminalWindow;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn host_for(snapshot: &StateSnapshot) -> TerminalHost {
        let host = TerminalHost::new();
        host.open_window(Arc::new(TerminalWindow::new(IntentChannel::new().0)));
        for server in &snapshot.servers {
            host.add_content(&server.url);
        }
        let mut engine = MenuEngine::new(Arc::new(Catalog::english()));
        let menu = NativeMenu::build(&engine.project(snapshot).unwrap());
        host.set_process_menu(Some(&menu)).unwrap();
        host
    }

    fn draw(snapshot: &StateSnapshot, tui: &mut TuiState, host: &TerminalHost) -> String {
        let t = Catalog::english();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, snapshot, tui, host, &t)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draw_server_view() {
        let snapshot = two_servers(Platform::Linux);
        let host = host_for(&snapshot);
        let text = draw(&snapshot, &mut TuiState::new(), &host);
        assert!(text.contains(" File "));
        assert!(text.contains("Connected to a"));
        assert!(text.contains("zoom +0"));
        assert!(text.contains("linux"));
    }

    #[test]
    fn test_status_line_shows_app_name_verbatim() {
        let mut snapshot = two_servers(Platform::Linux);
        snapshot.app_name = "R&D".into();
        let host = host_for(&snapshot);
        let text = draw(&snapshot, &mut TuiState::new(), &host);
        assert!(text.contains(" R&D "));
    }

    #[test]
    fn test_hidden_menu_bar_takes_no_row() {
        let mut snapshot = two_servers(Platform::Linux);
        snapshot.is_menu_bar_enabled = false;
        let host = host_for(&snapshot);
        let mut tui = TuiState::new();
        assert!(!draw(&snapshot, &mut tui, &host).contains(" File "));

        // Opening it with F10 brings it back.
        tui.menu_bar.open = Some(0);
        assert!(draw(&snapshot, &mut tui, &host).contains(" File "));
    }

    #[test]
    fn test_settings_view() {
        let mut snapshot = two_servers(Platform::Linux);
        snapshot.current_view = CurrentView::Settings;
        let host = host_for(&snapshot);
        let text = draw(&snapshot, &mut TuiState::new(), &host);
        assert!(text.contains("Certificates"));
        assert!(text.contains("Show tray icon"));
    }

    #[test]
    fn test_hidden_window() {
        let snapshot = two_servers(Platform::Linux);
        let host = host_for(&snapshot);
        crate::menu::sink::AppWindow::close(host.window().unwrap().as_ref());
        let text = draw(&snapshot, &mut TuiState::new(), &host);
        assert!(text.contains("Window hidden"));
        assert!(!text.contains("Connected to"));
    }
}
