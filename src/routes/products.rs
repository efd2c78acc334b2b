use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, info};

use crate::db::DatabaseOperations;
use crate::models::{AppState, Card, Listing, ListingsParams, ProductsParams, SearchParams};
use crate::search::{CatalogLookup, PgCatalog, SearchItem};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/products/{id}/listings", get(get_listings))
        .with_state(state)
}

/// Search box backend: matching cards projected to search items
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<SearchItem>>> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let items = PgCatalog::new(state.pool.clone()).lookup(&query).await?;
    debug!(query = %query, results = items.len(), "Catalog search");

    Ok(Json(items))
}

async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductsParams>,
) -> AppResult<Json<Vec<Card>>> {
    let search = params.search.unwrap_or_default();
    let cards = DatabaseOperations::find_cards_by_name(&state.pool, &search, None).await?;
    info!(search = %search, results = cards.len(), "Products listed");
    Ok(Json(cards))
}

fn parse_product_id(id: &str) -> AppResult<i64> {
    id.parse()
        .map_err(|_| AppError::NotFound(format!("Product {}", id)))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Card>> {
    let card_id = parse_product_id(&id)?;
    let card = DatabaseOperations::find_card(&state.pool, card_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))?;
    Ok(Json(card))
}

async fn get_listings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ListingsParams>,
) -> AppResult<Json<Vec<Listing>>> {
    let listings =
        DatabaseOperations::find_listings_for_product(&state.pool, &id, params.sort).await?;
    debug!(product_id = %id, sort = ?params.sort, results = listings.len(), "Listings loaded");
    Ok(Json(listings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_must_be_numeric() {
        assert_eq!(parse_product_id("46986414").unwrap(), 46986414);
        assert!(matches!(
            parse_product_id("LOB-005"),
            Err(AppError::NotFound(_))
        ));
    }
}
