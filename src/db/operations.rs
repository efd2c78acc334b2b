use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;
use crate::payment::{PayPalUpdate, StripeVendorUpdate};
use crate::types::AppResult;

/// Upper bound on rows a search-box lookup pulls from the catalog
pub const SEARCH_ROW_LIMIT: i64 = 100;

/// Escape LIKE metacharacters so user input only ever matches literally
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

const CARDS_BY_NAME: &str = r#"
    SELECT * FROM cards
    WHERE name ILIKE $1 ESCAPE '\'
    ORDER BY name, set_code
"#;

const CARDS_BY_NAME_LIMITED: &str = r#"
    SELECT * FROM cards
    WHERE name ILIKE $1 ESCAPE '\'
    ORDER BY name, set_code
    LIMIT $2
"#;

fn cards_by_name_sql(limited: bool) -> &'static str {
    if limited {
        CARDS_BY_NAME_LIMITED
    } else {
        CARDS_BY_NAME
    }
}

pub struct DatabaseOperations;

impl DatabaseOperations {
    // Catalog operations
    pub async fn find_cards_by_name(
        pool: &PgPool,
        query: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<Card>> {
        let pattern = like_pattern(query.trim());
        let cards = match limit {
            Some(limit) => {
                sqlx::query_as::<_, Card>(cards_by_name_sql(true))
                    .bind(pattern)
                    .bind(limit)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                sqlx::query_as::<_, Card>(cards_by_name_sql(false))
                    .bind(pattern)
                    .fetch_all(pool)
                    .await?
            }
        };

        Ok(cards)
    }

    pub async fn find_card(pool: &PgPool, id: i64) -> AppResult<Option<Card>> {
        let card = sqlx::query_as::<_, Card>("SELECT * FROM cards WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(card)
    }

    // Listing operations
    pub async fn find_listings_for_product(
        pool: &PgPool,
        product_id: &str,
        sort: ListingSort,
    ) -> AppResult<Vec<Listing>> {
        let order_by = match sort {
            ListingSort::PriceLow => {
                "COALESCE(price, 0) + COALESCE(shipping_cost, 0) ASC, created_at DESC"
            }
            ListingSort::PriceHigh => {
                "COALESCE(price, 0) + COALESCE(shipping_cost, 0) DESC, created_at DESC"
            }
            ListingSort::Newest => "created_at DESC NULLS LAST",
        };

        let sql = format!(
            "SELECT * FROM listings WHERE product_id = $1 ORDER BY {}",
            order_by
        );

        let listings = sqlx::query_as::<_, Listing>(&sql)
            .bind(product_id)
            .fetch_all(pool)
            .await?;

        Ok(listings)
    }

    // Profile operations
    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> AppResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(profile)
    }

    pub async fn upsert_profile_address(
        pool: &PgPool,
        user_id: Uuid,
        address: &UpdateProfileRequest,
    ) -> AppResult<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, street, street_number, postal_code, city, country)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                street = EXCLUDED.street,
                street_number = EXCLUDED.street_number,
                postal_code = EXCLUDED.postal_code,
                city = EXCLUDED.city,
                country = EXCLUDED.country,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(address.street.trim())
        .bind(address.street_number.trim())
        .bind(address.postal_code.trim())
        .bind(address.city.trim())
        .bind(address.country.trim().to_uppercase())
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }

    pub async fn set_stripe_account(
        pool: &PgPool,
        user_id: Uuid,
        account_id: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, stripe_account_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET
                stripe_account_id = EXCLUDED.stripe_account_id,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(account_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Mark the owner of a fully enabled Stripe account as vendor.
    /// Returns the number of profiles touched.
    pub async fn mark_stripe_vendor(pool: &PgPool, update: &StripeVendorUpdate) -> AppResult<u64> {
        let result = match update.user_id {
            Some(user_id) => {
                sqlx::query(
                    r#"
                    UPDATE profiles
                    SET stripe_account_id = $2, is_vendor = TRUE, updated_at = NOW()
                    WHERE user_id = $1
                    "#,
                )
                .bind(user_id)
                .bind(&update.account_id)
                .execute(pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE profiles
                    SET is_vendor = TRUE, updated_at = NOW()
                    WHERE stripe_account_id = $1
                    "#,
                )
                .bind(&update.account_id)
                .execute(pool)
                .await?
            }
        };

        Ok(result.rows_affected())
    }

    pub async fn apply_paypal_update(
        pool: &PgPool,
        user_id: Uuid,
        update: &PayPalUpdate,
    ) -> AppResult<u64> {
        let state = update.state().as_str();

        let result = match update {
            PayPalUpdate::Completed { merchant_id } => {
                sqlx::query(
                    r#"
                    UPDATE profiles
                    SET paypal_merchant_id = $2, paypal_onboarding_state = $3,
                        is_vendor = TRUE, updated_at = NOW()
                    WHERE user_id = $1
                    "#,
                )
                .bind(user_id)
                .bind(merchant_id)
                .bind(state)
                .execute(pool)
                .await?
            }
            PayPalUpdate::Revoked => {
                sqlx::query(
                    r#"
                    UPDATE profiles
                    SET paypal_merchant_id = NULL, paypal_onboarding_state = $2, updated_at = NOW()
                    WHERE user_id = $1
                    "#,
                )
                .bind(user_id)
                .bind(state)
                .execute(pool)
                .await?
            }
            PayPalUpdate::Failed | PayPalUpdate::Started => {
                sqlx::query(
                    r#"
                    UPDATE profiles
                    SET paypal_onboarding_state = $2, updated_at = NOW()
                    WHERE user_id = $1
                    "#,
                )
                .bind(user_id)
                .bind(state)
                .execute(pool)
                .await?
            }
        };

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_query() {
        assert_eq!(like_pattern("dark"), "%dark%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn test_only_limited_card_query_has_limit() {
        assert!(cards_by_name_sql(true).contains("LIMIT $2"));
        assert!(!cards_by_name_sql(false).contains("LIMIT"));
        assert!(cards_by_name_sql(false).contains("ORDER BY name, set_code"));
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }
}
