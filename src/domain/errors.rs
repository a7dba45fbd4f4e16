use thiserror::Error;

/// Errors related to license resolution and quota accounting
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("No license key provided")]
    Missing,

    #[error("Invalid license key format")]
    InvalidFormat,

    #[error("License not found")]
    NotFound,

    #[error("License is inactive")]
    Inactive,

    #[error("License has expired")]
    Expired,

    #[error("Unknown license tier: {0}")]
    UnknownTier(String),

    #[error("Daily API limit reached: {calls_today}/{limit} calls")]
    QuotaExceeded { calls_today: u32, limit: u32 },

    #[error("License storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Errors raised while processing a payment webhook
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook secret is not configured")]
    NotConfigured,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    License(#[from] LicenseError),
}

/// Errors surfaced by the pass-through upstream proxies
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{source_name} API error: status {status}")]
    Status { source_name: String, status: u16 },

    #[error("Failed to fetch from {source_name}: {reason}")]
    Transport { source_name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_formatting() {
        let error = LicenseError::QuotaExceeded {
            calls_today: 101,
            limit: 100,
        };

        let msg = error.to_string();
        assert!(msg.contains("101"));
        assert!(msg.contains("100"));
    }

    #[test]
    fn test_upstream_error_formatting() {
        let error = UpstreamError::Status {
            source_name: "Binance".to_string(),
            status: 418,
        };

        assert_eq!(error.to_string(), "Binance API error: status 418");
    }
}
