//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::tui::app::{App, View};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Tallest the results panel grows, borders included
pub const PANEL_MAX_HEIGHT: u16 = 14;

/// Header, body and status bar
pub fn screen_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    [chunks[0], chunks[1], chunks[2]]
}

/// Input box and, when open, the results panel right below it
pub fn search_layout(body: Rect, panel_open: bool) -> (Rect, Option<Rect>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body);

    let input = chunks[0];
    if !panel_open || chunks[1].height < 4 {
        return (input, None);
    }

    let panel = Rect {
        height: chunks[1].height.min(PANEL_MAX_HEIGHT),
        ..chunks[1]
    };
    (input, Some(panel))
}

/// Render the main UI
pub fn render(frame: &mut Frame, app: &App) {
    let [header, body, status] = screen_layout(frame.area());

    render_header(frame, header, app);

    let page = if app.view == View::Help {
        View::Search
    } else {
        app.view
    };
    match page {
        View::Results => widgets::render_results(frame, body, app),
        View::Product => widgets::render_product(frame, body, app),
        View::Search | View::Help => render_search(frame, body, app),
    }

    render_status_bar(frame, status, app);

    if app.view == View::Help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::raw("🃏 "),
        Span::styled("Card Market", Theme::title()),
        Span::styled(" Storefront", Theme::text_secondary()),
    ];
    if let Some(selected) = &app.selected {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(Icons::CHECK, Theme::success()));
        spans.push(Span::styled(format!(" {}", selected), Theme::text_secondary()));
    }

    let title = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .style(Style::default()),
        );

    frame.render_widget(title, area);
}

fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let panel_open = app.view == View::Search && app.search.is_open();
    let (input_area, panel_area) = search_layout(area, panel_open);

    widgets::render_search_input(frame, input_area, app);
    if let Some(panel) = panel_area {
        widgets::render_search_panel(frame, panel, app);
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = match (&app.status, app.loading) {
        (Some(message), _) => Span::styled(message.clone(), Theme::error()),
        (None, true) => Span::styled("Loading...", Theme::active()),
        (None, false) => Span::styled("Ready", Theme::text_secondary()),
    };

    let shortcuts = match app.view {
        View::Search => vec![
            (" [Enter]", " Search "),
            ("[↑/↓]", " Browse "),
            ("[Ctrl+U]", " Clear "),
        ],
        View::Results => vec![(" [Enter]", " Open "), ("[Esc]", " Back ")],
        View::Product => vec![(" [Tab]", " Sort "), ("[Esc]", " Back ")],
        View::Help => vec![],
    };

    let spans: Vec<Span> = std::iter::once(status)
        .chain(std::iter::once(Span::raw(" │")))
        .chain(shortcuts.into_iter().flat_map(|(key, desc)| {
            [
                Span::styled(key, Theme::shortcut_key()),
                Span::styled(desc, Theme::shortcut_desc()),
            ]
        }))
        .chain([
            Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
            Span::styled(" Quit ", Theme::shortcut_desc()),
            Span::styled("[F1]", Theme::shortcut_key()),
            Span::styled(" Help", Theme::shortcut_desc()),
        ])
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let rows = [
        ("Type         ", "Search the catalog"),
        ("↑/↓          ", "Move through results"),
        ("Enter        ", "Select highlighted card / search all"),
        ("Esc          ", "Close results / go back"),
        ("Ctrl+U       ", "Clear the search"),
        ("Tab          ", "Change listing order"),
        ("Click        ", "Select a card, or outside to close"),
        ("Ctrl+Q       ", "Quit application"),
        ("Ctrl+C       ", "Force quit"),
    ];

    let mut help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
    ];
    help_lines.extend(rows.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(*key, Theme::shortcut_key()),
            Span::styled(*desc, Theme::text()),
        ])
    }));
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Theme::text_dim(),
    )));

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_sits_under_input() {
        let body = Rect::new(0, 3, 80, 30);
        let (input, panel) = search_layout(body, true);
        let panel = panel.unwrap();

        assert_eq!(input.height, 3);
        assert_eq!(panel.y, input.y + input.height);
        assert_eq!(panel.height, PANEL_MAX_HEIGHT);
    }

    #[test]
    fn test_closed_panel_has_no_area() {
        let body = Rect::new(0, 3, 80, 30);
        assert!(search_layout(body, false).1.is_none());
    }
}
