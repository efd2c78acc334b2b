use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::search::{QuerySource, SearchOptions};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storefront: StorefrontConfig,
    pub search: SearchConfig,
    pub stripe: StripeConfig,
    pub paypal: PayPalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Empty when running the terminal client only
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    /// Public base URL of the storefront, used for provider return links
    pub public_url: String,
    /// Base URL the terminal client talks to
    pub api_url: String,
}

/// Search box tuning. Page size is fixed and not configurable.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub placeholder: String,
    pub empty_message: String,
    pub loading_message: String,
    pub debounce_ms: u64,
    pub max_items: usize,
    pub enter_query_source: QuerySource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub api_base: String,
    pub signature_tolerance_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayPalConfig {
    pub client_id: String,
    pub secret: String,
    pub api_base: String,
}

impl SearchConfig {
    pub fn to_options(&self) -> SearchOptions {
        SearchOptions {
            placeholder: self.placeholder.clone(),
            empty_message: self.empty_message.clone(),
            loading_message: self.loading_message.clone(),
            debounce: Duration::from_millis(self.debounce_ms),
            max_items: self.max_items,
            enter_query_source: self.enter_query_source,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        let options = SearchOptions::default();
        Self {
            placeholder: options.placeholder,
            empty_message: options.empty_message,
            loading_message: options.loading_message,
            debounce_ms: options.debounce.as_millis() as u64,
            max_items: options.max_items,
            enter_query_source: options.enter_query_source,
        }
    }
}

/// Local development values: no database, no payment providers
impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
                cors_allowed_origins: vec!["http://localhost:3000".to_string()],
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                min_connections: 1,
            },
            storefront: StorefrontConfig {
                public_url: "http://localhost:3000".to_string(),
                api_url: "http://localhost:3000".to_string(),
            },
            search: SearchConfig::default(),
            stripe: StripeConfig {
                secret_key: String::new(),
                webhook_secret: String::new(),
                api_base: "https://api.stripe.com".to_string(),
                signature_tolerance_secs: 300,
            },
            paypal: PayPalConfig {
                client_id: String::new(),
                secret: String::new(),
                api_base: "https://api-m.sandbox.paypal.com".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = SearchConfig::default();
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        Ok(Self {
            server: ServerConfig {
                port,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_default(),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
            },
            storefront: StorefrontConfig {
                public_url: env::var("PUBLIC_URL")
                    .unwrap_or_else(|_| format!("http://localhost:{}", port)),
                api_url: env::var("STOREFRONT_URL")
                    .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            },
            search: SearchConfig {
                placeholder: env::var("SEARCH_PLACEHOLDER").unwrap_or(defaults.placeholder),
                empty_message: env::var("SEARCH_EMPTY_MESSAGE").unwrap_or(defaults.empty_message),
                loading_message: env::var("SEARCH_LOADING_MESSAGE")
                    .unwrap_or(defaults.loading_message),
                debounce_ms: match env::var("SEARCH_DEBOUNCE_MS") {
                    Ok(v) => v.parse()?,
                    Err(_) => defaults.debounce_ms,
                },
                max_items: match env::var("SEARCH_MAX_ITEMS") {
                    Ok(v) => v.parse()?,
                    Err(_) => defaults.max_items,
                },
                enter_query_source: match env::var("SEARCH_ENTER_QUERY_SOURCE") {
                    Ok(v) => v.parse().map_err(|e: String| anyhow!(e))?,
                    Err(_) => defaults.enter_query_source,
                },
            },
            stripe: StripeConfig {
                secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
                webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
                api_base: env::var("STRIPE_API_BASE")
                    .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
                signature_tolerance_secs: env::var("STRIPE_SIGNATURE_TOLERANCE_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()?,
            },
            paypal: PayPalConfig {
                client_id: env::var("PAYPAL_CLIENT_ID").unwrap_or_default(),
                secret: env::var("PAYPAL_SECRET").unwrap_or_default(),
                api_base: env::var("PAYPAL_API_BASE")
                    .unwrap_or_else(|_| "https://api-m.sandbox.paypal.com".to_string()),
            },
        })
    }

    /// The server cannot start without a database.
    pub fn require_database(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(anyhow!("DATABASE_URL must be set"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_defaults_match_box_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.placeholder, "Search...");
        assert_eq!(config.debounce_ms, 400);
        assert_eq!(config.max_items, 100);

        let options = config.to_options();
        assert_eq!(options.debounce, Duration::from_millis(400));
        assert_eq!(options.enter_query_source, QuerySource::Raw);
    }

    #[test]
    fn test_default_config_needs_database_for_serving() {
        let config = Config::default();
        assert!(config.require_database().is_err());

        let mut config = Config::default();
        config.database.url = "postgres://localhost/card_market".to_string();
        assert!(config.require_database().is_ok());
    }
}
