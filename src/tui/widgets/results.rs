//! Results Widget
//!
//! Table of cards matching a submitted search.

use crate::tui::app::App;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" Results for \"{}\" ", app.results_query))
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    if app.results.is_empty() {
        let message = if app.loading {
            app.config.search.loading_message.as_str()
        } else {
            app.config.search.empty_message.as_str()
        };
        let paragraph = Paragraph::new(Line::styled(message, Theme::text_secondary())).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["Name", "Set", "Rarity", "Type", "Price"]).style(Theme::heading());
    let rows = app.results.iter().map(|card| {
        Row::new([
            Cell::from(card.name.clone()),
            Cell::from(card.set_code.clone()),
            Cell::from(card.set_rarity.clone()),
            Cell::from(card.human_readable_card_type.clone()),
            Cell::from(card.set_price.clone()).style(Theme::price()),
        ])
        .style(Theme::text())
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(36),
            Constraint::Percentage(14),
            Constraint::Percentage(18),
            Constraint::Percentage(20),
            Constraint::Percentage(12),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Theme::highlighted())
    .highlight_symbol(format!("{} ", Icons::SELECTED));

    let mut state = TableState::default().with_selected(Some(app.results_highlight));
    frame.render_stateful_widget(table, area, &mut state);
}
