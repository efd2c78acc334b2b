//! Application State
//!
//! Owns the search box, the document listener registry, and the page data
//! loaded through the storefront API.

use crate::client::StorefrontClient;
use crate::config::Config;
use crate::models::{Card, Listing, ListingSort};
use crate::search::{
    Bounds, DocumentEvent, DocumentEvents, DocumentKey, Route, ScrollMetrics, SearchBox,
};
use crate::tui::event::AppAction;
use crate::tui::ui;
use crate::types::AppResult;
use ratatui::layout::Rect;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tui_textarea::{CursorMove, TextArea};

/// Current view/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Search,
    Results,
    Product,
    Help,
}

/// Events from the search box callbacks and background loads
#[derive(Debug)]
pub enum AppEvent {
    /// Selection handler fired; empty on clear
    Selected(String),
    Navigate(Route),
    ResultsLoaded {
        search: String,
        result: AppResult<Vec<Card>>,
    },
    ProductLoaded {
        id: String,
        card: AppResult<Card>,
        listings: AppResult<Vec<Listing>>,
    },
    ListingsLoaded {
        id: String,
        sort: ListingSort,
        result: AppResult<Vec<Listing>>,
    },
}

/// Main application state
pub struct App {
    pub config: Config,

    // UI State
    pub view: View,
    help_return: View,
    pub should_quit: bool,

    // Search State
    pub search: SearchBox,
    document: DocumentEvents,
    pub input: TextArea<'static>,
    pub highlight: Option<usize>,
    pub panel_offset: usize,
    pub panel_rows: usize,
    pub panel_area: Option<Rect>,
    pub selected: Option<String>,

    // Results State
    pub results_query: String,
    pub results: Vec<Card>,
    pub results_highlight: usize,

    // Product State
    pub product_id: Option<String>,
    pub product: Option<Card>,
    pub listings: Vec<Listing>,
    pub listing_sort: ListingSort,

    pub loading: bool,
    pub status: Option<String>,

    client: StorefrontClient,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

fn new_input(text: &str, placeholder: &str) -> TextArea<'static> {
    let mut input = TextArea::new(vec![text.to_string()]);
    input.set_cursor_line_style(ratatui::style::Style::default());
    input.set_placeholder_text(placeholder.to_string());
    input.move_cursor(CursorMove::End);
    input
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        let client = StorefrontClient::new(reqwest::Client::new(), &config.storefront.api_url);
        let (tx, rx) = mpsc::unbounded_channel();

        let selection_tx = tx.clone();
        let on_select = move |id: &str| {
            selection_tx.send(AppEvent::Selected(id.to_string())).ok();
        };
        let navigate_tx = tx.clone();
        let navigate = move |route: Route| {
            navigate_tx.send(AppEvent::Navigate(route)).ok();
        };

        let options = config.search.to_options();
        let input = new_input("", &options.placeholder);
        let mut search = SearchBox::new(
            options,
            Arc::new(client.clone()),
            Arc::new(on_select),
            Arc::new(navigate),
        );

        let document = DocumentEvents::new();
        search.mount(&document);

        Self {
            config,
            view: View::Search,
            help_return: View::Search,
            should_quit: false,
            search,
            document,
            input,
            highlight: None,
            panel_offset: 0,
            panel_rows: 0,
            panel_area: None,
            selected: None,
            results_query: String::new(),
            results: Vec::new(),
            results_highlight: 0,
            product_id: None,
            product: None,
            listings: Vec::new(),
            listing_sort: ListingSort::default(),
            loading: false,
            status: None,
            client,
            event_rx: rx,
            event_tx: tx,
        }
    }

    /// Recompute the search box geometry for the current frame
    pub fn update_layout(&mut self, area: Rect) {
        let [_, body, _] = ui::screen_layout(area);
        let panel_open = self.view == View::Search && self.search.is_open();
        let (input_area, panel_area) = ui::search_layout(body, panel_open);

        self.panel_area = panel_area;
        // Borders plus the footer line
        self.panel_rows = panel_area
            .map(|p| p.height.saturating_sub(3) as usize)
            .unwrap_or(0);

        let region = panel_area
            .map(|p| input_area.union(p))
            .unwrap_or(input_area);
        self.search.set_bounds(Bounds {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        });
    }

    /// Run after the pending input has been drained
    pub fn update(&mut self) {
        self.search.sync_deferred();
        self.search.poll();
        self.poll_events();

        let shown = self.search.displayed().len();
        if self.highlight.is_some_and(|i| i >= shown) {
            self.highlight = shown.checked_sub(1);
        }
    }

    /// Poll for async events
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Selected(id) => {
                if id.is_empty() {
                    self.selected = None;
                } else {
                    self.selected = Some(id.clone());
                    self.open_route(Route::Product { id });
                }
            }
            AppEvent::Navigate(route) => self.open_route(route),
            AppEvent::ResultsLoaded { search, result } => {
                if search != self.results_query {
                    return;
                }
                self.loading = false;
                match result {
                    Ok(cards) => self.results = cards,
                    Err(e) => {
                        warn!(error = %e, "Failed to load results");
                        self.status = Some(e.to_string());
                    }
                }
            }
            AppEvent::ProductLoaded { id, card, listings } => {
                if self.product_id.as_deref() != Some(id.as_str()) {
                    return;
                }
                self.loading = false;
                match card {
                    Ok(card) => self.product = Some(card),
                    Err(e) => {
                        warn!(product_id = %id, error = %e, "Failed to load product");
                        self.status = Some(e.to_string());
                    }
                }
                match listings {
                    Ok(listings) => self.listings = listings,
                    Err(e) => warn!(product_id = %id, error = %e, "Failed to load listings"),
                }
            }
            AppEvent::ListingsLoaded { id, sort, result } => {
                if self.product_id.as_deref() != Some(id.as_str()) || sort != self.listing_sort {
                    return;
                }
                match result {
                    Ok(listings) => self.listings = listings,
                    Err(e) => {
                        warn!(product_id = %id, error = %e, "Failed to load listings");
                        self.status = Some(e.to_string());
                    }
                }
            }
        }
    }

    fn open_route(&mut self, route: Route) {
        info!(route = %route, "Navigating");
        self.status = None;
        self.loading = true;

        let client = self.client.clone();
        let tx = self.event_tx.clone();

        match route {
            Route::Products { search } => {
                self.view = View::Results;
                self.results_query = search.clone();
                self.results.clear();
                self.results_highlight = 0;

                tokio::spawn(async move {
                    let result = client.products(&search).await;
                    tx.send(AppEvent::ResultsLoaded { search, result }).ok();
                });
            }
            Route::Product { id } => {
                self.view = View::Product;
                self.product_id = Some(id.clone());
                self.product = None;
                self.listings.clear();
                let sort = self.listing_sort;

                tokio::spawn(async move {
                    let (card, listings) =
                        tokio::join!(client.product(&id), client.listings(&id, sort));
                    tx.send(AppEvent::ProductLoaded { id, card, listings }).ok();
                });
            }
        }
    }

    fn reload_listings(&mut self) {
        let Some(id) = self.product_id.clone() else {
            return;
        };
        let sort = self.listing_sort;
        let client = self.client.clone();
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let result = client.listings(&id, sort).await;
            tx.send(AppEvent::ListingsLoaded { id, sort, result }).ok();
        });
    }

    /// Handle a user action
    pub fn handle_action(&mut self, action: AppAction) {
        if self.view == View::Help && action != AppAction::Tick {
            self.view = self.help_return;
            return;
        }

        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::ToggleHelp => {
                self.help_return = self.view;
                self.view = View::Help;
            }
            AppAction::Submit => self.submit(),
            AppAction::Escape => {
                if self.view == View::Search {
                    self.document.dispatch(DocumentEvent::Key(DocumentKey::Escape));
                } else {
                    self.back_to_search();
                }
            }
            AppAction::Up => match self.view {
                View::Search => self.move_highlight_up(),
                View::Results => {
                    self.results_highlight = self.results_highlight.saturating_sub(1);
                }
                _ => {}
            },
            AppAction::Down => match self.view {
                View::Search => self.move_highlight_down(),
                View::Results => {
                    if self.results_highlight + 1 < self.results.len() {
                        self.results_highlight += 1;
                    }
                }
                _ => {}
            },
            AppAction::Clear => {
                self.search.clear();
                self.reset_panel();
                self.sync_input();
                if self.search.take_focus_request() {
                    self.back_to_search();
                }
            }
            AppAction::CycleSort => {
                if self.view == View::Product {
                    self.listing_sort = self.listing_sort.next();
                    self.reload_listings();
                }
            }
            AppAction::PointerDown { x, y } => {
                self.document.dispatch(DocumentEvent::PointerDown { x, y });
                if self.view == View::Search {
                    self.click_panel(x, y);
                }
            }
            AppAction::Input(key) => {
                if self.view == View::Search && self.input.input(key) {
                    let text = self.input.lines().join("");
                    self.search.on_input_change(text);
                    self.reset_panel();
                }
            }
            AppAction::Tick => {}
        }
    }

    fn submit(&mut self) {
        match self.view {
            View::Search => {
                let highlighted = self
                    .highlight
                    .filter(|_| self.search.is_open())
                    .and_then(|i| self.search.displayed().get(i))
                    .map(|item| item.value.clone());

                match highlighted {
                    Some(value) => {
                        self.search.select(&value);
                        self.reset_panel();
                        self.sync_input();
                    }
                    None => {
                        self.document.dispatch(DocumentEvent::Key(DocumentKey::Enter));
                    }
                }
            }
            View::Results => {
                if let Some(card) = self.results.get(self.results_highlight) {
                    let id = card.id.to_string();
                    self.open_route(Route::Product { id });
                }
            }
            View::Product | View::Help => {}
        }
    }

    fn back_to_search(&mut self) {
        self.view = View::Search;
        self.search.on_focus();
    }

    fn reset_panel(&mut self) {
        self.highlight = None;
        self.panel_offset = 0;
    }

    /// Rebuild the text field when the search box rewrote its input
    fn sync_input(&mut self) {
        if self.input.lines().join("") != self.search.input() {
            self.input = new_input(self.search.input(), &self.search.options().placeholder);
        }
    }

    fn move_highlight_up(&mut self) {
        if let Some(i) = self.highlight {
            self.highlight = i.checked_sub(1);
            if let Some(i) = self.highlight {
                self.panel_offset = self.panel_offset.min(i);
            }
        }
    }

    fn move_highlight_down(&mut self) {
        let shown = self.search.displayed().len();
        if !self.search.is_open() || shown == 0 {
            return;
        }

        let next = self.highlight.map_or(0, |i| (i + 1).min(shown - 1));
        self.highlight = Some(next);

        let visible = self.panel_rows.max(1);
        if next >= self.panel_offset + visible {
            self.panel_offset = next + 1 - visible;
        }

        if next == shown - 1 {
            self.search.on_scroll(self.panel_metrics());
        }
    }

    pub fn panel_metrics(&self) -> ScrollMetrics {
        let visible = self.panel_rows.max(1);
        let content = self.search.displayed().len().max(visible);
        ScrollMetrics {
            scroll_top: self.panel_offset as f64,
            scroll_height: content as f64,
            client_height: visible as f64,
        }
    }

    /// Clicking a row selects it; clicking the footer loads more
    fn click_panel(&mut self, x: u16, y: u16) {
        let Some(panel) = self.panel_area else {
            return;
        };
        if !self.search.is_open()
            || x <= panel.x
            || x + 1 >= panel.x + panel.width
            || y <= panel.y
        {
            return;
        }

        let row = (y - panel.y - 1) as usize;
        let shown = self.search.displayed().len();
        let visible_items = shown.saturating_sub(self.panel_offset).min(self.panel_rows);

        if row < visible_items {
            let index = self.panel_offset + row;
            if let Some(value) = self.search.displayed().get(index).map(|i| i.value.clone()) {
                self.search.select(&value);
                self.reset_panel();
                self.sync_input();
            }
        } else if row == visible_items && self.search.can_load_more() {
            self.search.load_more();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(AppAction::Input(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )));
        }
    }

    #[tokio::test]
    async fn test_typing_opens_panel() {
        let mut app = App::new(Config::default());
        assert!(app.search.is_mounted());

        type_text(&mut app, "dark");
        assert_eq!(app.search.input(), "dark");
        assert!(app.search.is_open());
    }

    #[tokio::test]
    async fn test_clear_resets_selection() {
        let mut app = App::new(Config::default());
        app.selected = Some("46986414".to_string());
        type_text(&mut app, "dark");

        app.handle_action(AppAction::Clear);
        app.update();

        assert_eq!(app.search.input(), "");
        assert!(app.input.lines().join("").is_empty());
        assert!(!app.search.is_open());
        assert_eq!(app.selected, None);
    }

    #[tokio::test]
    async fn test_enter_without_highlight_navigates_to_results() {
        let mut app = App::new(Config::default());
        type_text(&mut app, "dark magician");

        app.handle_action(AppAction::Submit);
        app.update();

        assert_eq!(app.view, View::Results);
        assert_eq!(app.results_query, "dark magician");
        assert!(!app.search.is_open());
    }

    #[tokio::test]
    async fn test_escape_closes_panel_then_returns_from_results() {
        let mut app = App::new(Config::default());
        type_text(&mut app, "kuriboh");

        app.handle_action(AppAction::Escape);
        app.update();
        assert!(!app.search.is_open());

        app.view = View::Results;
        app.handle_action(AppAction::Escape);
        assert_eq!(app.view, View::Search);
        // Focusing a non-empty input reopens the panel
        assert!(app.search.is_open());
    }

    #[tokio::test]
    async fn test_selection_event_opens_product() {
        let mut app = App::new(Config::default());
        app.handle_event(AppEvent::Selected("46986414".to_string()));

        assert_eq!(app.selected.as_deref(), Some("46986414"));
        assert_eq!(app.view, View::Product);
        assert_eq!(app.product_id.as_deref(), Some("46986414"));
        assert!(app.loading);
    }

    #[tokio::test]
    async fn test_stale_results_are_ignored() {
        let mut app = App::new(Config::default());
        app.results_query = "kuriboh".to_string();
        app.loading = true;

        app.handle_event(AppEvent::ResultsLoaded {
            search: "dark".to_string(),
            result: Ok(Vec::new()),
        });
        assert!(app.loading);

        app.handle_event(AppEvent::ResultsLoaded {
            search: "kuriboh".to_string(),
            result: Ok(Vec::new()),
        });
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_help_closes_on_any_key() {
        let mut app = App::new(Config::default());
        app.view = View::Results;

        app.handle_action(AppAction::ToggleHelp);
        assert_eq!(app.view, View::Help);
        app.handle_action(AppAction::Tick);
        assert_eq!(app.view, View::Help);
        app.handle_action(AppAction::Up);
        assert_eq!(app.view, View::Results);
    }
}
