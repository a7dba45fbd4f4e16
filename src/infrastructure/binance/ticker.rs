//! Binance 24h ticker source
//!
//! Reads `/api/v3/ticker/24hr` for a single pair. Binance encodes every
//! decimal as a string, so each field is parsed and rejected if not finite.

use crate::domain::ports::{TickerSnapshot, TickerSource};
use crate::infrastructure::core::http_client_factory::{build_url_with_query, join_url};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Ticker24hr {
    symbol: Option<String>,
    price_change_percent: Option<String>,
    last_price: Option<String>,
    high_price: Option<String>,
    low_price: Option<String>,
}

impl Ticker24hr {
    pub(crate) fn into_snapshot(self, fallback_symbol: &str) -> Result<TickerSnapshot> {
        let raw = self
            .price_change_percent
            .context("Binance ticker has no priceChangePercent")?;
        let price_change_percent = parse_decimal_string(&raw)
            .with_context(|| format!("Invalid priceChangePercent: {:?}", raw))?;

        Ok(TickerSnapshot {
            symbol: self.symbol.unwrap_or_else(|| fallback_symbol.to_string()),
            price_change_percent,
            last_price: self.last_price.as_deref().and_then(parse_decimal_string),
            high_price: self.high_price.as_deref().and_then(parse_decimal_string),
            low_price: self.low_price.as_deref().and_then(parse_decimal_string),
        })
    }
}

fn parse_decimal_string(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub struct BinanceTickerSource {
    client: ClientWithMiddleware,
    base_url: String,
    symbol: String,
}

impl BinanceTickerSource {
    pub fn new(client: ClientWithMiddleware, base_url: String, symbol: String) -> Self {
        Self {
            client,
            base_url,
            symbol,
        }
    }
}

#[async_trait]
impl TickerSource for BinanceTickerSource {
    async fn fetch_ticker(&self) -> Result<TickerSnapshot> {
        let url = build_url_with_query(
            &join_url(&self.base_url, "api/v3/ticker/24hr"),
            &[("symbol", self.symbol.as_str())],
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch 24hr ticker from Binance")?;

        if !response.status().is_success() {
            anyhow::bail!("Binance 24hr ticker returned status: {}", response.status());
        }

        let ticker: Ticker24hr = response
            .json()
            .await
            .context("Failed to parse Binance 24hr ticker")?;

        let snapshot = ticker.into_snapshot(&self.symbol)?;
        debug!(
            "Binance ticker {}: {:+.2}% (last {:?})",
            snapshot.symbol, snapshot.price_change_percent, snapshot.last_price
        );
        Ok(snapshot)
    }
}
