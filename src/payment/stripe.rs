//! Stripe Connect
//!
//! - Webhook signature verification (`Stripe-Signature` header, HMAC-SHA256)
//! - Event classification for vendor onboarding
//! - Express account + onboarding link creation

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::StripeConfig;
use crate::types::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Signature scheme Stripe currently signs with
const SIGNATURE_SCHEME: &str = "v1";

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    /// Connected account the event originated from
    #[serde(default)]
    pub account: Option<String>,
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
struct StripeAccount {
    id: String,
    #[serde(default)]
    charges_enabled: bool,
    #[serde(default)]
    payouts_enabled: bool,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
struct StripeObjectRef {
    id: String,
}

/// Profile change once a connected account can take charges and payouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeVendorUpdate {
    /// Owner recorded in the account metadata at creation time
    pub user_id: Option<Uuid>,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripeEventOutcome {
    VendorReady(StripeVendorUpdate),
    AccountPending { account_id: String },
    PaymentIntentSucceeded { id: String },
    PaymentMethodAttached { id: String },
    Unhandled(String),
}

// =============================================================================
// Signatures
// =============================================================================

/// Hex HMAC-SHA256 of `"{timestamp}.{payload}"`
#[cfg(test)]
pub(crate) fn sign_payload(payload: &str, secret: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a `Stripe-Signature` header against the raw request body
pub fn verify_signature(
    payload: &str,
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> AppResult<()> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            SIGNATURE_SCHEME => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        AppError::Webhook("Unable to extract timestamp and signatures from header".to_string())
    })?;
    if signatures.is_empty() {
        return Err(AppError::Webhook(
            "No signatures found with expected scheme".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());

    // verify_slice compares in constant time
    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });
    if !matched {
        return Err(AppError::Webhook(
            "No signatures found matching the expected signature for payload".to_string(),
        ));
    }

    if tolerance_secs > 0 && (now - timestamp).abs() > tolerance_secs {
        return Err(AppError::Webhook(
            "Timestamp outside the tolerance zone".to_string(),
        ));
    }

    Ok(())
}

/// Verify and parse a webhook body
pub fn construct_event(
    payload: &str,
    header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> AppResult<StripeEvent> {
    verify_signature(
        payload,
        header,
        secret,
        tolerance_secs,
        chrono::Utc::now().timestamp(),
    )?;
    serde_json::from_str(payload).map_err(|e| AppError::Webhook(format!("Invalid payload: {}", e)))
}

// =============================================================================
// Events
// =============================================================================

pub fn classify_event(event: &StripeEvent) -> AppResult<StripeEventOutcome> {
    let object = event.data.object.clone();

    let outcome = match event.event_type.as_str() {
        "account.updated" => {
            let account: StripeAccount = serde_json::from_value(object)
                .map_err(|e| AppError::Webhook(format!("Invalid account object: {}", e)))?;
            let account_id = event.account.clone().unwrap_or(account.id);

            if account.charges_enabled && account.payouts_enabled {
                let user_id = match account.metadata.get("user_id") {
                    Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
                        AppError::Webhook(format!("Invalid user_id metadata: {}", raw))
                    })?),
                    None => None,
                };
                StripeEventOutcome::VendorReady(StripeVendorUpdate { user_id, account_id })
            } else {
                StripeEventOutcome::AccountPending { account_id }
            }
        }
        "payment_intent.succeeded" => {
            let intent: StripeObjectRef = serde_json::from_value(object)
                .map_err(|e| AppError::Webhook(e.to_string()))?;
            StripeEventOutcome::PaymentIntentSucceeded { id: intent.id }
        }
        "payment_method.attached" => {
            let method: StripeObjectRef = serde_json::from_value(object)
                .map_err(|e| AppError::Webhook(e.to_string()))?;
            StripeEventOutcome::PaymentMethodAttached { id: method.id }
        }
        other => StripeEventOutcome::Unhandled(other.to_string()),
    };

    Ok(outcome)
}

// =============================================================================
// Connect onboarding
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreatedAccount {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AccountLink {
    url: String,
}

pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(client: Client, config: &StripeConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self
            .client
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&self.secret_key)
            .form(form)
            .send()
            .await?;

        let status = response.status();
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

    /// Create an Express connected account owned by `user_id`
    pub async fn create_express_account(&self, user_id: Uuid) -> AppResult<String> {
        let account: CreatedAccount = self
            .post_form(
                "/v1/accounts",
                &[
                    ("type", "express".to_string()),
                    ("metadata[user_id]", user_id.to_string()),
                    ("capabilities[card_payments][requested]", "true".to_string()),
                    ("capabilities[transfers][requested]", "true".to_string()),
                ],
            )
            .await?;

        info!(user_id = %user_id, account_id = %account.id, "Stripe account created");
        Ok(account.id)
    }

    /// Hosted onboarding URL for a connected account
    pub async fn create_account_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> AppResult<String> {
        let link: AccountLink = self
            .post_form(
                "/v1/account_links",
                &[
                    ("account", account_id.to_string()),
                    ("refresh_url", refresh_url.to_string()),
                    ("return_url", return_url.to_string()),
                    ("type", "account_onboarding".to_string()),
                ],
            )
            .await?;

        debug!(account_id, "Stripe account link created");
        Ok(link.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn account_event(charges: bool, payouts: bool, metadata: serde_json::Value) -> StripeEvent {
        serde_json::from_value(serde_json::json!({
            "id": "evt_1",
            "type": "account.updated",
            "account": "acct_123",
            "data": {
                "object": {
                    "id": "acct_123",
                    "object": "account",
                    "charges_enabled": charges,
                    "payouts_enabled": payouts,
                    "metadata": metadata
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_signature() {
        let payload = r#"{"id":"evt_1"}"#;
        let now = 1_700_000_000;
        let header = format!("t={},v1={}", now, sign_payload(payload, SECRET, now));
        tokio_test::assert_ok!(verify_signature(payload, &header, SECRET, 300, now + 10));
    }

    #[test]
    fn test_any_matching_v1_signature_is_accepted() {
        let payload = r#"{"id":"evt_1"}"#;
        let now = 1_700_000_000;
        let header = format!(
            "t={},v1={},v1={},v0=ignored",
            now,
            "00".repeat(32),
            sign_payload(payload, SECRET, now)
        );
        tokio_test::assert_ok!(verify_signature(payload, &header, SECRET, 300, now));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let now = 1_700_000_000;
        let header = format!("t={},v1={}", now, sign_payload(r#"{"id":"evt_1"}"#, SECRET, now));
        let err = verify_signature(r#"{"id":"evt_2"}"#, &header, SECRET, 300, now).unwrap_err();
        assert!(err.to_string().contains("No signatures found matching"));
    }

    #[test]
    fn test_old_timestamp_is_rejected() {
        let payload = "{}";
        let then = 1_700_000_000;
        let header = format!("t={},v1={}", then, sign_payload(payload, SECRET, then));
        let err = verify_signature(payload, &header, SECRET, 300, then + 301).unwrap_err();
        assert!(err.to_string().contains("tolerance"));
    }

    #[test]
    fn test_malformed_headers() {
        assert!(verify_signature("{}", "v1=abcd", SECRET, 300, 0).is_err());
        assert!(verify_signature("{}", "t=12", SECRET, 300, 12).is_err());
        assert!(verify_signature("{}", "", SECRET, 300, 0).is_err());
    }

    #[test]
    fn test_account_ready_becomes_vendor() {
        let user_id = Uuid::new_v4();
        let event = account_event(true, true, serde_json::json!({ "user_id": user_id.to_string() }));

        let outcome = classify_event(&event).unwrap();
        assert_eq!(
            outcome,
            StripeEventOutcome::VendorReady(StripeVendorUpdate {
                user_id: Some(user_id),
                account_id: "acct_123".to_string(),
            })
        );
    }

    #[test]
    fn test_account_without_payouts_is_pending() {
        let event = account_event(true, false, serde_json::json!({}));
        assert_eq!(
            classify_event(&event).unwrap(),
            StripeEventOutcome::AccountPending {
                account_id: "acct_123".to_string()
            }
        );
    }

    #[test]
    fn test_account_without_owner_metadata() {
        let event = account_event(true, true, serde_json::json!({}));
        match classify_event(&event).unwrap() {
            StripeEventOutcome::VendorReady(update) => {
                assert!(update.user_id.is_none());
                assert_eq!(update.account_id, "acct_123");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_payment_and_unknown_events() {
        let event: StripeEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_2",
            "type": "payment_intent.succeeded",
            "data": { "object": { "id": "pi_42", "amount": 1000 } }
        }))
        .unwrap();
        assert_eq!(
            classify_event(&event).unwrap(),
            StripeEventOutcome::PaymentIntentSucceeded { id: "pi_42".to_string() }
        );

        let event: StripeEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_3",
            "type": "customer.created",
            "data": { "object": { "id": "cus_1" } }
        }))
        .unwrap();
        assert_eq!(
            classify_event(&event).unwrap(),
            StripeEventOutcome::Unhandled("customer.created".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_express_account() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/accounts")
            .match_header("authorization", "Bearer sk_test_123")
            .match_body(mockito::Matcher::UrlEncoded("type".into(), "express".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"acct_new","object":"account"}"#)
            .create_async()
            .await;

        let config = StripeConfig {
            secret_key: "sk_test_123".to_string(),
            webhook_secret: String::new(),
            api_base: server.url(),
            signature_tolerance_secs: 300,
        };
        let client = StripeClient::new(Client::new(), &config);

        let account_id = client.create_express_account(Uuid::new_v4()).await.unwrap();
        assert_eq!(account_id, "acct_new");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/account_links")
            .with_status(400)
            .with_body("invalid account")
            .create_async()
            .await;

        let config = StripeConfig {
            secret_key: "sk_test_123".to_string(),
            webhook_secret: String::new(),
            api_base: server.url(),
            signature_tolerance_secs: 300,
        };
        let client = StripeClient::new(Client::new(), &config);

        let err = client
            .create_account_link("acct_x", "http://localhost/refresh", "http://localhost/onboarding")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Provider error: Error 400: invalid account");
    }
}
