//! HTTP client for the storefront API, used by the terminal storefront

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Card, Listing, ListingSort};
use crate::search::{CatalogLookup, SearchItem};
use crate::types::{AppError, AppResult};

#[derive(Clone)]
pub struct StorefrontClient {
    client: Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Storefront request");

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Error {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        Ok(response.json().await?)
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<SearchItem>> {
        self.get_json("/api/search", &[("q", query)]).await
    }

    pub async fn products(&self, search: &str) -> AppResult<Vec<Card>> {
        self.get_json("/api/products", &[("search", search)]).await
    }

    pub async fn product(&self, id: &str) -> AppResult<Card> {
        let path = format!("/api/products/{}", urlencoding::encode(id));
        self.get_json(&path, &[]).await
    }

    pub async fn listings(&self, id: &str, sort: ListingSort) -> AppResult<Vec<Listing>> {
        let path = format!("/api/products/{}/listings", urlencoding::encode(id));
        self.get_json(&path, &[("sort", sort.as_str())]).await
    }
}

#[async_trait]
impl CatalogLookup for StorefrontClient {
    async fn lookup(&self, query: &str) -> AppResult<Vec<SearchItem>> {
        self.search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_lookup_queries_search_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/search")
            .match_query(Matcher::UrlEncoded("q".into(), "dark magician".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"value":"46986414","name":"Dark Magician","setCode":"LOB-005","rarity":"(UR)","imageUrl":"/a.png"}]"#,
            )
            .create_async()
            .await;

        let client = StorefrontClient::new(Client::new(), &format!("{}/", server.url()));
        let items = client.lookup("dark magician").await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].value, "46986414");
        assert_eq!(items[0].set_code, "LOB-005");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/products/999")
            .with_status(404)
            .with_body(r#"{"error":"Not found: Product 999"}"#)
            .create_async()
            .await;

        let client = StorefrontClient::new(Client::new(), &server.url());
        let err = client.product("999").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listings_pass_sort() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/products/46986414/listings")
            .match_query(Matcher::UrlEncoded("sort".into(), "newest".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = StorefrontClient::new(Client::new(), &server.url());
        let listings = client.listings("46986414", ListingSort::Newest).await.unwrap();
        assert!(listings.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/products")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = StorefrontClient::new(Client::new(), &server.url());
        let err = client.products("x").await.unwrap_err();
        assert_eq!(err.to_string(), "Provider error: Error 500: boom");
    }
}
