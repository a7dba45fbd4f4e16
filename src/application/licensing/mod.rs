// License lookup, quota accounting and payment webhooks
pub mod license_service;
pub mod webhook;

pub use license_service::{LicenseService, QuotaDecision};
pub use webhook::{WebhookOutcome, WebhookProcessor};
