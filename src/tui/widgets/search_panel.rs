//! Search Widgets
//!
//! The query input and the dropdown panel of matching cards.

use crate::search::SearchItem;
use crate::tui::app::{App, View};
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the query input with its loading and clear indicators
pub fn render_search_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" {} Search ", Icons::SEARCH))
        .borders(Borders::ALL)
        .border_style(if app.view == View::Search {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(4)])
        .split(inner);

    frame.render_widget(&app.input, chunks[0]);

    let mut indicators = Vec::new();
    if app.search.is_loading() {
        indicators.push(Span::styled(Icons::LOADING, Theme::active()));
    }
    if !app.search.input().is_empty() {
        indicators.push(Span::raw(" "));
        indicators.push(Span::styled(Icons::CLEAR, Theme::text_dim()));
    }
    frame.render_widget(Paragraph::new(Line::from(indicators)), chunks[1]);
}

fn item_line<'a>(item: &'a SearchItem, selected: bool, highlighted: bool, width: usize) -> Line<'a> {
    let check = if selected { Icons::CHECK } else { " " };
    let thumbnail = if item.image_url.is_some() {
        Icons::THUMBNAIL
    } else {
        " "
    };
    let marker = if highlighted { Icons::SELECTED } else { " " };

    let mut spans = vec![
        Span::styled(format!("{} ", marker), Theme::active()),
        Span::styled(format!("{} ", check), Theme::success()),
        Span::styled(format!("{} ", thumbnail), Theme::text_secondary()),
        Span::styled(
            super::truncate_string(&item.name, width.saturating_sub(24).max(8)),
            Theme::text(),
        ),
        Span::raw("  "),
        Span::styled(item.set_code.as_str(), Theme::text_secondary()),
    ];
    if let Some(rarity) = &item.rarity {
        spans.push(Span::styled(format!(" ({})", rarity), Theme::text_dim()));
    }

    let line = Line::from(spans);
    if highlighted {
        line.style(Theme::highlighted())
    } else {
        line
    }
}

/// Render the open results panel
pub fn render_search_panel(frame: &mut Frame, area: Rect, app: &App) {
    let search = &app.search;
    let options = search.options();
    let displayed = search.displayed();

    frame.render_widget(Clear, area);
    let title = if displayed.is_empty() {
        " Results ".to_string()
    } else {
        format!(" Results {}/{} ", displayed.len(), search.items().len())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    if search.shows_empty_message() {
        lines.push(Line::from(Span::styled(
            options.empty_message.as_str(),
            Theme::text_secondary(),
        )));
    }
    if search.shows_start_prompt() {
        lines.push(Line::from(Span::styled(
            "Start typing to search",
            Theme::text_dim(),
        )));
    }

    let width = inner.width as usize;
    lines.extend(
        displayed
            .iter()
            .enumerate()
            .skip(app.panel_offset)
            .take(app.panel_rows)
            .map(|(index, item)| {
                let selected = app.selected.as_deref() == Some(item.value.as_str());
                item_line(item, selected, app.highlight == Some(index), width)
            }),
    );

    if search.can_load_more() {
        lines.push(Line::from(Span::styled(
            format!("{} Load more", Icons::MORE),
            Theme::text_secondary(),
        )));
    }
    if search.is_loading() {
        lines.push(Line::from(Span::styled(
            options.loading_message.as_str(),
            Theme::active(),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
