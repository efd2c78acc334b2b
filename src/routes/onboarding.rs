use axum::{extract::State, routing::post, Json, Router};
use tracing::info;

use crate::db::DatabaseOperations;
use crate::middleware::CurrentUser;
use crate::models::{AppState, OnboardingResponse};
use crate::payment::{PayPalClient, StripeClient};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/onboarding/paypal", post(onboard_paypal))
        .route("/api/onboarding/stripe", post(onboard_stripe))
        .with_state(state)
}

fn onboarding_url(state: &AppState) -> String {
    format!(
        "{}/onboarding",
        state.config.storefront.public_url.trim_end_matches('/')
    )
}

async fn onboard_paypal(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<OnboardingResponse>> {
    let client = PayPalClient::new(state.http.clone(), &state.config.paypal);
    if !client.is_configured() {
        return Err(AppError::Provider("PayPal is not configured".to_string()));
    }

    let referral = client
        .create_partner_referral(user_id, &onboarding_url(&state))
        .await?;
    let url = referral
        .action_url()
        .ok_or_else(|| AppError::Provider("PayPal referral without action_url".to_string()))?
        .to_string();

    info!(user_id = %user_id, "PayPal onboarding started");
    Ok(Json(OnboardingResponse {
        url,
        links: referral.links,
    }))
}

async fn onboard_stripe(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> AppResult<Json<OnboardingResponse>> {
    let client = StripeClient::new(state.http.clone(), &state.config.stripe);
    if !client.is_configured() {
        return Err(AppError::Provider("Stripe is not configured".to_string()));
    }

    // Reuse the connected account from an earlier, unfinished attempt
    let existing = DatabaseOperations::get_profile(&state.pool, user_id)
        .await?
        .and_then(|profile| profile.stripe_account_id);

    let account_id = match existing {
        Some(account_id) => account_id,
        None => {
            let account_id = client.create_express_account(user_id).await?;
            DatabaseOperations::set_stripe_account(&state.pool, user_id, &account_id).await?;
            account_id
        }
    };

    let return_url = onboarding_url(&state);
    let refresh_url = format!("{}?refresh=stripe", return_url);
    let url = client
        .create_account_link(&account_id, &refresh_url, &return_url)
        .await?;

    info!(user_id = %user_id, account_id = %account_id, "Stripe onboarding started");
    Ok(Json(OnboardingResponse {
        url,
        links: Vec::new(),
    }))
}
