//! Upstream market-data configuration parsed from environment variables.
//!
//! Covers the three sources feeding the sentiment score:
//! - Binance 24h ticker
//! - CoinGecko global market stats
//! - alternative.me Fear & Greed index

use crate::infrastructure::core::HttpClientSettings;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct UpstreamEnvConfig {
    pub binance_base_url: String,
    pub coingecko_base_url: String,
    pub alternative_me_base_url: String,
    /// Reference trading pair for the ticker, e.g. BTCUSDT
    pub ticker_symbol: String,
    /// Asset id looked up in CoinGecko's market-cap breakdown
    pub dominance_asset: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for UpstreamEnvConfig {
    fn default() -> Self {
        Self {
            binance_base_url: "https://api.binance.com".to_string(),
            coingecko_base_url: "https://api.coingecko.com".to_string(),
            alternative_me_base_url: "https://api.alternative.me".to_string(),
            ticker_symbol: "BTCUSDT".to_string(),
            dominance_asset: "btc".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 3,
        }
    }
}

impl UpstreamEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            binance_base_url: base_url_var("BINANCE_BASE_URL", &defaults.binance_base_url)?,
            coingecko_base_url: base_url_var("COINGECKO_BASE_URL", &defaults.coingecko_base_url)?,
            alternative_me_base_url: base_url_var(
                "ALTERNATIVE_ME_BASE_URL",
                &defaults.alternative_me_base_url,
            )?,
            ticker_symbol: env::var("TICKER_SYMBOL")
                .unwrap_or(defaults.ticker_symbol)
                .to_uppercase(),
            dominance_asset: env::var("DOMINANCE_ASSET")
                .unwrap_or(defaults.dominance_asset)
                .to_lowercase(),
            request_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("Failed to parse UPSTREAM_TIMEOUT_SECS")?,
            connect_timeout_secs: env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .context("Failed to parse UPSTREAM_CONNECT_TIMEOUT_SECS")?,
            max_retries: env::var("UPSTREAM_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<u32>()
                .context("Failed to parse UPSTREAM_MAX_RETRIES")?,
        })
    }

    pub fn http_settings(&self) -> HttpClientSettings {
        HttpClientSettings {
            timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            max_retries: self.max_retries,
        }
    }
}

/// Read a base URL, rejecting anything that is not absolute http(s)
fn base_url_var(name: &str, default: &str) -> Result<String> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let parsed = Url::parse(&raw).with_context(|| format!("Invalid {}: {}", name, raw))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Invalid {}: {} (must be http or https)", name, raw);
    }

    Ok(raw.trim_end_matches('/').to_string())
}
