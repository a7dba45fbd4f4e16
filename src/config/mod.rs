//! Configuration module for MarketCube.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Server, Upstream sources, Licensing, and Observability.

mod license_config;
mod observability_config;
mod server_config;
mod upstream_config;

pub use license_config::LicenseEnvConfig;
pub use observability_config::ObservabilityEnvConfig;
pub use server_config::ServerEnvConfig;
pub use upstream_config::UpstreamEnvConfig;

use anyhow::{Context, Result};

/// Main application configuration.
///
/// Aggregates the sub-configs; each one can also be loaded on its own.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub upstream: UpstreamEnvConfig,
    pub license: LicenseEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This orchestrates loading from all sub-config modules and composes
    /// them into a unified Config struct.
    pub fn from_env() -> Result<Self> {
        let server = ServerEnvConfig::from_env().context("Failed to load server config")?;
        let upstream = UpstreamEnvConfig::from_env().context("Failed to load upstream config")?;
        let license = LicenseEnvConfig::from_env().context("Failed to load license config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            server,
            upstream,
            license,
            observability,
        })
    }
}
