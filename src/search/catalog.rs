use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{DatabaseOperations, SEARCH_ROW_LIMIT};
use crate::search::SearchItem;
use crate::types::AppResult;

/// Resolves a text query to matching catalog items.
///
/// One call is one best-effort fetch. Callers treat any error as "no results".
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> AppResult<Vec<SearchItem>>;
}

/// Receives the identifier of the chosen item, or an empty string on clear.
pub trait SelectionHandler: Send + Sync {
    fn on_select(&self, identifier: &str);
}

impl<F> SelectionHandler for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_select(&self, identifier: &str) {
        self(identifier)
    }
}

/// Client-side routes the search box can navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Results page for a free-text query
    Products { search: String },
    /// Detail page for a single product
    Product { id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Products { search } => {
                format!("/products?search={}", urlencoding::encode(search))
            }
            Route::Product { id } => format!("/products/{}", urlencoding::encode(id)),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Fire-and-forget client-side navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl<F> Navigator for F
where
    F: Fn(Route) + Send + Sync,
{
    fn navigate(&self, route: Route) {
        self(route)
    }
}

/// Catalog lookup backed directly by the cards table
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
    limit: i64,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            limit: SEARCH_ROW_LIMIT,
        }
    }

    pub fn row_limit(&self) -> i64 {
        self.limit
    }
}

#[async_trait]
impl CatalogLookup for PgCatalog {
    async fn lookup(&self, query: &str) -> AppResult<Vec<SearchItem>> {
        let cards =
            DatabaseOperations::find_cards_by_name(&self.pool, query, Some(self.limit)).await?;
        Ok(cards.into_iter().map(SearchItem::from).collect())
    }
}
