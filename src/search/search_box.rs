//! Incremental Search Box
//!
//! State machine behind the autocomplete input:
//!
//! ```text
//!  keystroke ─► on_input_change ─► raw input (immediate)
//!                                     │
//!  host idle ─► sync_deferred ───────►│ deferred copy changed
//!                                     ▼
//!                       abort pending timer, bump generation
//!                                     │ quiet period elapsed
//!                                     ▼
//!                       Fire ─► CatalogLookup (spawned)
//!                                     │
//!                       Completed ─► applied only if generation is latest
//! ```
//!
//! Timers and lookups run as tokio tasks that report back over a channel.
//! All state changes happen on the owner's side in `poll()` / `process_next()`.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::search::{
    CatalogLookup, DocumentEvent, DocumentEvents, DocumentKey, Navigator, QuerySource, Route,
    SearchItem, SearchOptions, SelectionHandler, Subscription, PAGE_SIZE,
};
use crate::types::AppResult;

/// Screen region occupied by the component (input plus open panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x as u32) < self.x as u32 + self.width as u32
            && (y as u32) < self.y as u32 + self.height as u32
    }
}

/// Scroll position of the results panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Within one unit of the content bottom
    pub fn at_bottom(&self) -> bool {
        (self.scroll_height - self.client_height - self.scroll_top).abs() < 1.0
    }
}

#[derive(Debug)]
enum LookupEvent {
    /// Quiet period elapsed for this generation
    Fire { generation: u64, query: String },
    Completed {
        generation: u64,
        result: AppResult<Vec<SearchItem>>,
    },
}

pub struct SearchBox {
    options: SearchOptions,
    catalog: Arc<dyn CatalogLookup>,
    selection: Arc<dyn SelectionHandler>,
    navigator: Arc<dyn Navigator>,

    // Input state
    input: String,
    deferred: String,

    // UI state
    open: bool,
    loading: bool,
    focus_requested: bool,
    bounds: Option<Bounds>,

    // Results state
    items: Vec<SearchItem>,
    displayed: Vec<SearchItem>,
    page: usize,

    // Lookup scheduling
    generation: u64,
    in_flight: Option<u64>,
    pending: Option<JoinHandle<()>>,
    events_tx: mpsc::UnboundedSender<LookupEvent>,
    events_rx: mpsc::UnboundedReceiver<LookupEvent>,

    subscription: Option<Subscription>,
}

impl SearchBox {
    pub fn new(
        options: SearchOptions,
        catalog: Arc<dyn CatalogLookup>,
        selection: Arc<dyn SelectionHandler>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            options,
            catalog,
            selection,
            navigator,
            input: String::new(),
            deferred: String::new(),
            open: false,
            loading: false,
            focus_requested: false,
            bounds: None,
            items: Vec::new(),
            displayed: Vec::new(),
            page: 1,
            generation: 0,
            in_flight: None,
            pending: None,
            events_tx,
            events_rx,
            subscription: None,
        }
    }

    // === Accessors ===

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn deferred_input(&self) -> &str {
        &self.deferred
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Full result list of the last successful lookup
    pub fn items(&self) -> &[SearchItem] {
        &self.items
    }

    /// Currently revealed page(s) of `items`
    pub fn displayed(&self) -> &[SearchItem] {
        &self.displayed
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Returns true once after `clear()` asked for the input to be focused
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
    }

    /// "Start typing to search" hint
    pub fn shows_start_prompt(&self) -> bool {
        self.deferred.trim().is_empty()
    }

    pub fn shows_empty_message(&self) -> bool {
        !self.loading && self.displayed.is_empty() && !self.deferred.trim().is_empty()
    }

    pub fn can_load_more(&self) -> bool {
        !self.loading && self.items.len() > self.displayed.len()
    }

    // === Lifecycle ===

    /// Start receiving document-level key and pointer events
    pub fn mount(&mut self, events: &DocumentEvents) {
        self.subscription = Some(events.subscribe());
    }

    /// Release the document listeners and any scheduled lookup
    pub fn unmount(&mut self) {
        self.subscription = None;
        self.cancel_pending();
    }

    // === Input ===

    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.input = text.into();

        let has_query = !self.input.trim().is_empty();
        if has_query && !self.open {
            self.open = true;
        }
        if !has_query && self.open {
            self.open = false;
        }
    }

    pub fn on_focus(&mut self) {
        if !self.input.trim().is_empty() {
            self.open = true;
        }
    }

    /// Catch the deferred copy up with the raw input.
    ///
    /// Hosts call this after draining their pending input events, so the
    /// lookup schedule never sits between a keystroke and its echo.
    pub fn sync_deferred(&mut self) {
        if self.deferred != self.input {
            self.deferred = self.input.clone();
            self.on_deferred_change();
        }
    }

    fn on_deferred_change(&mut self) {
        self.cancel_pending();
        self.generation += 1;

        let query = self.deferred.trim().to_string();
        if query.is_empty() {
            self.items.clear();
            self.displayed.clear();
            return;
        }

        let generation = self.generation;
        let delay = self.options.debounce;
        let tx = self.events_tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send(LookupEvent::Fire { generation, query }).ok();
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    // === Event processing ===

    /// Apply everything that arrived since the last call, without waiting
    pub fn poll(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_lookup_event(event);
        }

        let document_events: Vec<DocumentEvent> = match self.subscription.as_mut() {
            Some(sub) => std::iter::from_fn(|| sub.try_recv()).collect(),
            None => Vec::new(),
        };
        for event in document_events {
            self.handle_document_event(event);
        }
    }

    /// Wait for the next timer or lookup message and apply it
    pub async fn process_next(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_lookup_event(event);
        }
    }

    /// Process messages until no timer is pending and no lookup is in flight
    pub async fn run_until_idle(&mut self) {
        while self.pending.is_some() || self.in_flight.is_some() {
            self.process_next().await;
        }
    }

    fn handle_lookup_event(&mut self, event: LookupEvent) {
        match event {
            LookupEvent::Fire { generation, query } => {
                if generation != self.generation {
                    debug!(generation, "Ignoring superseded debounce timer");
                    return;
                }
                self.pending = None;
                self.start_lookup(generation, query);
            }
            LookupEvent::Completed { generation, result } => {
                if self.in_flight == Some(generation) {
                    self.in_flight = None;
                    self.loading = false;
                }

                if generation != self.generation {
                    debug!(
                        generation,
                        latest = self.generation,
                        "Discarding stale lookup response"
                    );
                    return;
                }

                match result {
                    Ok(results) => {
                        debug!(count = results.len(), "Lookup results applied");
                        self.items = results;
                        self.page = 1;
                        self.reveal_pages(1);
                    }
                    Err(e) => {
                        error!(error = %e, "Error fetching data");
                        self.items.clear();
                        self.displayed.clear();
                    }
                }
            }
        }
    }

    fn start_lookup(&mut self, generation: u64, query: String) {
        self.loading = true;
        self.in_flight = Some(generation);
        debug!(generation, query = %query, "Starting catalog lookup");

        let catalog = self.catalog.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = catalog.lookup(&query).await;
            tx.send(LookupEvent::Completed { generation, result }).ok();
        });
    }

    fn reveal_pages(&mut self, pages: usize) {
        let end = (pages * PAGE_SIZE)
            .min(self.items.len())
            .min(self.options.max_items);
        self.displayed = self.items[..end].to_vec();
    }

    // === Pagination ===

    /// Reveal the next page of already-fetched results
    pub fn load_more(&mut self) {
        let shown = self.page * PAGE_SIZE;
        if shown < self.items.len() && shown < self.options.max_items {
            self.page += 1;
            self.reveal_pages(self.page);
        }
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        if metrics.at_bottom() {
            self.load_more();
        }
    }

    // === Selection ===

    pub fn select(&mut self, identifier: &str) {
        let Some(item) = self.items.iter().find(|item| item.value == identifier) else {
            return;
        };

        let name = item.name.clone();
        self.selection.on_select(identifier);
        self.input = name;
        self.open = false;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.deferred.clear();
        // Anything still scheduled or in flight belongs to the old text
        self.cancel_pending();
        self.generation += 1;
        self.page = 1;
        self.loading = false;
        self.selection.on_select("");
        self.open = false;
        self.items.clear();
        self.displayed.clear();
        self.focus_requested = true;
    }

    // === Dismissal ===

    pub fn handle_document_event(&mut self, event: DocumentEvent) {
        if !self.open {
            return;
        }

        match event {
            DocumentEvent::Key(DocumentKey::Escape) => {
                self.open = false;
            }
            DocumentEvent::Key(DocumentKey::Enter) => {
                let search = match self.options.enter_query_source {
                    QuerySource::Raw => self.input.clone(),
                    QuerySource::Deferred => self.deferred.clone(),
                };
                info!(query = %search, "Searching for");
                self.navigator.navigate(Route::Products { search });
                self.open = false;
            }
            DocumentEvent::PointerDown { x, y } => {
                if let Some(bounds) = self.bounds {
                    if !bounds.contains(x, y) {
                        self.open = false;
                    }
                }
            }
        }
    }
}

impl Drop for SearchBox {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
