use sqlx::PgPool;
use crate::config::Config;
use crate::search::SearchItem;
use validator::Validate;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub http: reqwest::Client,
}

// Catalog and marketplace rows
// Note: FromRow is used with runtime query_as (no DATABASE_URL needed at compile time)

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: i64,
    pub name: String,
    pub archetype: String,
    pub card_image: String,
    pub description: String,
    pub frame_type: String,
    pub human_readable_card_type: String,
    pub race: String,
    pub set_code: String,
    pub set_name: String,
    pub set_price: String,
    pub set_rarity: String,
    pub set_rarity_code: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub card_type: String,
    pub ygoprodeck_url: String,
}

impl From<Card> for SearchItem {
    fn from(card: Card) -> Self {
        SearchItem {
            value: card.id.to_string(),
            name: card.name,
            set_code: card.set_code,
            rarity: Some(card.set_rarity_code).filter(|r| !r.is_empty()),
            image_url: Some(card.card_image).filter(|url| !url.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "condition_enum")]
pub enum Condition {
    #[serde(rename = "mint")]
    #[sqlx(rename = "mint")]
    Mint,
    #[serde(rename = "near mint")]
    #[sqlx(rename = "near mint")]
    NearMint,
    #[serde(rename = "lightly played")]
    #[sqlx(rename = "lightly played")]
    LightlyPlayed,
    #[serde(rename = "moderately played")]
    #[sqlx(rename = "moderately played")]
    ModeratelyPlayed,
    #[serde(rename = "heavily played")]
    #[sqlx(rename = "heavily played")]
    HeavilyPlayed,
    #[serde(rename = "damaged")]
    #[sqlx(rename = "damaged")]
    Damaged,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Mint => write!(f, "Mint"),
            Condition::NearMint => write!(f, "Near Mint"),
            Condition::LightlyPlayed => write!(f, "Lightly Played"),
            Condition::ModeratelyPlayed => write!(f, "Moderately Played"),
            Condition::HeavilyPlayed => write!(f, "Heavily Played"),
            Condition::Damaged => write!(f, "Damaged"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_type_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Card,
    Set,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: uuid::Uuid,
    pub product_id: String,
    pub product_type: ProductType,
    pub vendor_id: Option<uuid::Uuid>,
    pub condition: Option<Condition>,
    pub price: Option<f64>,
    pub shipping_cost: Option<f64>,
    pub stock_quantity: Option<i32>,
    pub description: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Listing {
    /// Price plus shipping, treating missing amounts as zero
    pub fn total_price(&self) -> f64 {
        self.price.unwrap_or(0.0) + self.shipping_cost.unwrap_or(0.0)
    }
}

/// Listing ordering offered by the listings table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
pub enum ListingSort {
    #[default]
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
    #[serde(rename = "newest")]
    Newest,
}

impl ListingSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingSort::PriceLow => "price-low",
            ListingSort::PriceHigh => "price-high",
            ListingSort::Newest => "newest",
        }
    }

    /// Next ordering in the cycle offered by the product view
    pub fn next(self) -> Self {
        match self {
            ListingSort::PriceLow => ListingSort::PriceHigh,
            ListingSort::PriceHigh => ListingSort::Newest,
            ListingSort::Newest => ListingSort::PriceLow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PayPalOnboardingState {
    Started,
    Completed,
    Revoked,
    Failed,
}

impl PayPalOnboardingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayPalOnboardingState::Started => "Started",
            PayPalOnboardingState::Completed => "Completed",
            PayPalOnboardingState::Revoked => "Revoked",
            PayPalOnboardingState::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub user_id: uuid::Uuid,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub is_vendor: Option<bool>,
    pub stripe_account_id: Option<String>,
    pub paypal_merchant_id: Option<String>,
    pub paypal_onboarding_state: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

// API Request/Response types

#[derive(Debug, serde::Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ProductsParams {
    pub search: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ListingsParams {
    #[serde(default)]
    pub sort: ListingSort,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "House number is required"))]
    pub street_number: String,
    #[validate(length(min = 1, message = "Postal code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(equal = 2, message = "Country must be a two-letter code"))]
    pub country: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct OnboardingResponse {
    /// Where the user continues onboarding with the provider
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub links: Vec<crate::payment::ProviderLink>,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
