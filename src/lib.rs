// Card Market - trading card storefront with incremental catalog search

pub mod client;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod payment;
pub mod routes;
pub mod search;    // Debounced search box, listeners, catalog capabilities
pub mod tui;       // Terminal storefront
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
