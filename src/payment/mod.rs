// Payment provider integrations for vendor onboarding (Stripe Connect, PayPal partner referrals)

pub mod paypal;
pub mod stripe;

pub use paypal::{PayPalClient, PayPalUpdate, PayPalWebhook};
pub use stripe::{StripeClient, StripeEvent, StripeEventOutcome, StripeVendorUpdate};

use serde::{Deserialize, Serialize};

/// HATEOAS link returned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderLink {
    pub href: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}
