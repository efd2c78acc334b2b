use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::db::DatabaseOperations;
use crate::models::AppState;
use crate::payment::{stripe, PayPalWebhook, StripeEventOutcome};
use crate::types::{AppError, AppResult};

pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/webhooks/stripe", post(stripe_webhook))
        .route("/api/webhooks/paypal", post(paypal_webhook))
        .with_state(state)
}

/// Stripe signs the exact request bytes, so the body is taken raw
async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<Value>> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Webhook("Missing Stripe-Signature header".to_string()))?;

    let config = &state.config.stripe;
    if config.webhook_secret.is_empty() {
        return Err(AppError::Webhook("Webhook secret not configured".to_string()));
    }

    let event = stripe::construct_event(
        &body,
        signature,
        &config.webhook_secret,
        config.signature_tolerance_secs,
    )
    .map_err(|e| {
        warn!(error = %e, "Stripe webhook rejected");
        e
    })?;

    match stripe::classify_event(&event)? {
        StripeEventOutcome::VendorReady(update) => {
            let updated = DatabaseOperations::mark_stripe_vendor(&state.pool, &update).await?;
            if updated == 0 {
                warn!(account_id = %update.account_id, "No profile for enabled Stripe account");
            } else {
                info!(account_id = %update.account_id, "Stripe vendor enabled");
            }
        }
        StripeEventOutcome::AccountPending { account_id } => {
            info!(account_id = %account_id, "Stripe account not yet enabled");
        }
        StripeEventOutcome::PaymentIntentSucceeded { id } => {
            info!(payment_intent = %id, "PaymentIntent was successful");
        }
        StripeEventOutcome::PaymentMethodAttached { id } => {
            info!(payment_method = %id, "PaymentMethod was attached to a Customer");
        }
        StripeEventOutcome::Unhandled(event_type) => {
            info!(event_type = %event_type, "Unhandled Stripe event type");
        }
    }

    Ok(Json(json!({ "received": true })))
}

async fn paypal_webhook(State(state): State<AppState>, body: String) -> AppResult<Json<Value>> {
    handle_paypal_event(&state, &body).await.map_err(|e| {
        error!(error = %e, "Error processing PayPal webhook");
        AppError::Internal(e.to_string())
    })?;

    Ok(Json(json!({ "success": true })))
}

async fn handle_paypal_event(state: &AppState, body: &str) -> AppResult<()> {
    let event: PayPalWebhook = serde_json::from_str(body)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid PayPal payload: {}", e)))?;

    let Some((user_id, update)) = event.profile_update()? else {
        info!(event_type = %event.event_type, "Unhandled PayPal event type");
        return Ok(());
    };

    let updated = DatabaseOperations::apply_paypal_update(&state.pool, user_id, &update).await?;
    if updated == 0 {
        warn!(user_id = %user_id, event_type = %event.event_type, "No profile for PayPal event");
    } else {
        info!(
            user_id = %user_id,
            state = update.state().as_str(),
            "PayPal onboarding state updated"
        );
    }

    Ok(())
}
