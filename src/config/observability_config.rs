//! Observability configuration parsing from environment variables.

use std::env;

/// Observability environment configuration
#[derive(Debug, Clone)]
pub struct ObservabilityEnvConfig {
    /// Expose `/metrics`
    pub enabled: bool,
    /// Log output format: "pretty" or "compact"
    pub log_format: String,
}

impl Default for ObservabilityEnvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_format: "pretty".to_string(),
        }
    }
}

impl ObservabilityEnvConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("OBSERVABILITY_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
            log_format: env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|_| "pretty".to_string()),
        }
    }
}
