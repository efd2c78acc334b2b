//! Search Module
//!
//! Incremental, debounced catalog search used by the storefront clients:
//! - `SearchBox` - keystroke capture, debounced lookup, local pagination, selection
//! - `CatalogLookup` / `SelectionHandler` / `Navigator` - capabilities injected by the host
//! - `DocumentEvents` - scoped key and pointer listeners shared by mounted boxes
//!
//! The box never talks to a database or a terminal directly. The host feeds it
//! input and events and drains its internal messages with `poll()`.

pub mod catalog;
pub mod item;
pub mod listeners;
pub mod options;
pub mod search_box;

pub use catalog::{CatalogLookup, Navigator, PgCatalog, Route, SelectionHandler};
pub use item::SearchItem;
pub use listeners::{DocumentEvent, DocumentEvents, DocumentKey, Subscription};
pub use options::{QuerySource, SearchOptions, PAGE_SIZE};
pub use search_box::{Bounds, ScrollMetrics, SearchBox};
