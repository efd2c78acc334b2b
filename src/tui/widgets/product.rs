//! Product Widget
//!
//! Card details plus the vendor listings for it.

use crate::models::Listing;
use crate::tui::app::App;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

fn money(amount: Option<f64>) -> String {
    amount
        .map(|a| format!("${:.2}", a))
        .unwrap_or_else(|| "-".to_string())
}

fn listing_row(listing: &Listing) -> Row<'static> {
    Row::new([
        Cell::from(
            listing
                .condition
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        Cell::from(money(listing.price)).style(Theme::price()),
        Cell::from(money(listing.shipping_cost)),
        Cell::from(format!("${:.2}", listing.total_price())),
        Cell::from(
            listing
                .stock_quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
    ])
    .style(Theme::text())
}

pub fn render_product(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(area);

    let details = match &app.product {
        Some(card) => vec![
            Line::from(vec![
                Span::styled(card.name.clone(), Theme::title()),
                Span::styled(format!("  {}", card.set_code), Theme::text_secondary()),
            ]),
            Line::from(Span::styled(
                format!(
                    "{} · {} · {}",
                    card.human_readable_card_type, card.race, card.set_rarity
                ),
                Theme::text_secondary(),
            )),
            Line::from(Span::styled(card.set_name.clone(), Theme::text_dim())),
            Line::from(""),
            Line::from(Span::styled(card.description.clone(), Theme::text())),
        ],
        None if app.loading => vec![Line::styled(
            app.config.search.loading_message.clone(),
            Theme::active(),
        )],
        None => vec![Line::styled("Product not found", Theme::error())],
    };

    let title = app
        .product_id
        .as_deref()
        .map(|id| format!(" Product {} ", id))
        .unwrap_or_else(|| " Product ".to_string());
    let paragraph = Paragraph::new(details)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Theme::border_focused()),
        );
    frame.render_widget(paragraph, chunks[0]);

    let block = Block::default()
        .title(format!(" Listings ({}) ", app.listing_sort.as_str()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if app.listings.is_empty() {
        let paragraph = Paragraph::new(Line::styled(
            "No listings for this card yet",
            Theme::text_secondary(),
        ))
        .block(block);
        frame.render_widget(paragraph, chunks[1]);
        return;
    }

    let header = Row::new(["Condition", "Price", "Shipping", "Total", "Stock"]).style(Theme::heading());
    let table = Table::new(
        app.listings.iter().map(listing_row),
        [
            Constraint::Percentage(28),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(Some(2.5)), "$2.50");
        assert_eq!(money(None), "-");
    }
}
