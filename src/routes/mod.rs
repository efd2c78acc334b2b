//! API Routes
//!
//! - `/api/health` - Health checks
//! - `/api/search`, `/api/products` - Catalog lookup and product pages
//! - `/api/profile` - Shipping address of the caller
//! - `/api/onboarding` - Vendor onboarding with Stripe and PayPal
//! - `/api/webhooks` - Provider callbacks

pub mod health;
pub mod onboarding;
pub mod products;
pub mod profile;
pub mod webhooks;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let allowed_origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(health::router(state.clone()))
        .merge(products::router(state.clone()))
        .merge(profile::router(state.clone()))
        .merge(onboarding::router(state.clone()))
        .merge(webhooks::router(state))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &allowed_origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::payment::stripe::sign_payload;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use tower::ServiceExt;

    const WEBHOOK_SECRET: &str = "whsec_test";

    fn test_state() -> AppState {
        // Nothing listens on port 1, so any database call fails fast
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://card_market@127.0.0.1:1/card_market")
            .unwrap();

        let mut config = Config::default();
        config.server.cors_allowed_origins = vec!["*".to_string()];
        config.stripe.webhook_secret = WEBHOOK_SECRET.to_string();

        AppState {
            pool,
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_blank_search_returns_empty_list() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/search?q=%20%20").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_non_numeric_product_is_not_found() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/products/LOB-005").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profile_requires_user_header() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected_before_storage() {
        let app = create_router(test_state());
        let body = serde_json::json!({
            "street": "",
            "street_number": "12",
            "postal_code": "10001",
            "city": "New York",
            "country": "US"
        });
        let response = app
            .oneshot(
                Request::put("/api/profile")
                    .header("x-user-id", uuid::Uuid::new_v4().to_string())
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["fields"]["street"], "Street is required");
    }

    #[tokio::test]
    async fn test_stripe_webhook_rejects_bad_signature() {
        let app = create_router(test_state());
        let payload = r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_1"}}}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let header = format!("t={},v1={}", timestamp, sign_payload(payload, "wrong", timestamp));

        let response = app
            .oneshot(
                Request::post("/api/webhooks/stripe")
                    .header("stripe-signature", header)
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Webhook Error: "));
    }

    #[tokio::test]
    async fn test_stripe_webhook_accepts_signed_payment_event() {
        let app = create_router(test_state());
        let payload = r#"{"id":"evt_1","type":"payment_intent.succeeded","data":{"object":{"id":"pi_1"}}}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let header = format!(
            "t={},v1={}",
            timestamp,
            sign_payload(payload, WEBHOOK_SECRET, timestamp)
        );

        let response = app
            .oneshot(
                Request::post("/api/webhooks/stripe")
                    .header("stripe-signature", header)
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "received": true }));
    }

    #[tokio::test]
    async fn test_paypal_webhook_ignores_unhandled_events() {
        let app = create_router(test_state());
        let payload = r#"{"event_type":"PAYMENT.CAPTURE.COMPLETED","resource":{}}"#;
        let response = app
            .oneshot(
                Request::post("/api/webhooks/paypal")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_paypal_webhook_without_tracking_id_fails() {
        let app = create_router(test_state());
        let payload = r#"{"event_type":"MERCHANT.ONBOARDING.COMPLETED","resource":{"merchant_id":"M1"}}"#;
        let response = app
            .oneshot(
                Request::post("/api/webhooks/paypal")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Internal Server Error" })
        );
    }

    #[tokio::test]
    async fn test_health_reports_unavailable_database() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["database"], "unavailable");
        assert_eq!(json["status"], "degraded");
    }
}
