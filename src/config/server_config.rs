//! HTTP server and feed behaviour parsed from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
    /// When false, every request is answered with synthetic data
    pub live_data_enabled: bool,
    /// Fixed seed for the demo generator (reproducible demo data)
    pub fallback_seed: Option<u64>,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            live_data_enabled: true,
            fallback_seed: None,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("Failed to parse PORT")?,
            live_data_enabled: env::var("LIVE_DATA_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .context("Failed to parse LIVE_DATA_ENABLED")?,
            fallback_seed: match env::var("FALLBACK_SEED") {
                Ok(raw) => Some(
                    raw.parse::<u64>()
                        .context("Failed to parse FALLBACK_SEED")?,
                ),
                Err(_) => None,
            },
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.bind_address, self.port))
    }
}
