//! Payment webhook: signature check and license issuance on new orders.

use super::license_service::LicenseService;
use crate::domain::errors::WebhookError;
use crate::domain::license::{License, LicenseKey, LicenseTier};
use hmac::{Hmac, Mac};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, info, warn};

type HmacSha256 = Hmac<Sha256>;

const ORDER_CREATED: &str = "order_created";

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub meta: WebhookMeta,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookMeta {
    pub event_name: String,
    #[serde(default)]
    pub custom_data: Option<CustomData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomData {
    #[serde(default)]
    pub license_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub attributes: OrderAttributes,
}

#[derive(Debug, Deserialize)]
pub struct OrderAttributes {
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub total_usd_cents: Option<i64>,
}

/// What a processed webhook amounted to
#[derive(Debug)]
pub enum WebhookOutcome {
    LicenseIssued(License),
    Ignored { event_name: String },
}

pub struct WebhookProcessor {
    secret: Option<String>,
    licenses: Arc<LicenseService>,
}

impl WebhookProcessor {
    pub fn new(secret: Option<String>, licenses: Arc<LicenseService>) -> Self {
        Self { secret, licenses }
    }

    /// Check the signature over the raw body, then act on the event
    pub async fn process(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<WebhookOutcome, WebhookError> {
        let secret = self.secret.as_deref().ok_or(WebhookError::NotConfigured)?;
        verify_signature(secret, body, signature.unwrap_or_default())?;

        let payload: WebhookPayload = serde_json::from_slice(body)
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

        if payload.meta.event_name != ORDER_CREATED {
            debug!("Webhook: ignoring event {}", payload.meta.event_name);
            return Ok(WebhookOutcome::Ignored {
                event_name: payload.meta.event_name,
            });
        }

        self.handle_order_created(payload).await
    }

    async fn handle_order_created(
        &self,
        payload: WebhookPayload,
    ) -> Result<WebhookOutcome, WebhookError> {
        let attributes = payload
            .data
            .map(|d| d.attributes)
            .ok_or_else(|| WebhookError::MalformedPayload("missing data.attributes".to_string()))?;

        let email = attributes
            .customer_email
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| WebhookError::MalformedPayload("missing customer_email".to_string()))?;

        let cents = attributes.total_usd_cents.unwrap_or(0);
        let plan = LicenseTier::from_price(Decimal::new(cents, 2));

        let requested_key = payload
            .meta
            .custom_data
            .and_then(|c| c.license_key)
            .and_then(|raw| match LicenseKey::parse(raw.trim()) {
                Ok(key) => Some(key),
                Err(_) => {
                    warn!("Webhook: ignoring malformed custom license key {:?}", raw);
                    None
                }
            });

        let license = self
            .licenses
            .issue_license(&email, plan, requested_key)
            .await?;

        info!(
            "Webhook: order for {} (${}) -> {} license {}",
            email,
            Decimal::new(cents, 2),
            plan,
            license.license_key
        );
        Ok(WebhookOutcome::LicenseIssued(license))
    }
}

/// Lowercase hex HMAC-SHA256 of `body`
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String, WebhookError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::NotConfigured)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison of a hex signature against the body's HMAC
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> Result<(), WebhookError> {
    let expected = hex::decode(signature.trim()).map_err(|_| WebhookError::InvalidSignature)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::NotConfigured)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| WebhookError::InvalidSignature)
}
