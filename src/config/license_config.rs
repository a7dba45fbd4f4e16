//! License and quota configuration parsed from environment variables.

use crate::domain::license::CallLimits;
use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct LicenseEnvConfig {
    /// Serve demo data to callers without a license key
    pub require_license: bool,
    /// Shared secret for payment webhook signatures
    pub webhook_secret: Option<String>,
    /// SQLite URL; in-memory storage when unset
    pub database_url: Option<String>,
    pub call_limits: CallLimits,
}

impl Default for LicenseEnvConfig {
    fn default() -> Self {
        Self {
            require_license: true,
            webhook_secret: None,
            database_url: None,
            call_limits: CallLimits::default(),
        }
    }
}

impl LicenseEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = CallLimits::default();

        Ok(Self {
            require_license: env::var("REQUIRE_LICENSE")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .context("Failed to parse REQUIRE_LICENSE")?,
            webhook_secret: non_empty_var("LEMON_SQUEEZY_WEBHOOK_SECRET"),
            database_url: non_empty_var("DATABASE_URL"),
            call_limits: CallLimits {
                basic: limit_var("CALLS_LIMIT_BASIC", defaults.basic)?,
                pro: limit_var("CALLS_LIMIT_PRO", defaults.pro)?,
                elite: limit_var("CALLS_LIMIT_ELITE", defaults.elite)?,
            },
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn limit_var(name: &str, default: u32) -> Result<u32> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("Failed to parse {}", name)),
        Err(_) => Ok(default),
    }
}
