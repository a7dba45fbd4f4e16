use crate::domain::ports::{DominanceSource, GlobalMarketSnapshot};
use crate::infrastructure::core::http_client_factory::join_url;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct GlobalResponse {
    data: Option<GlobalData>,
}

#[derive(Debug, Deserialize)]
struct GlobalData {
    market_cap_percentage: Option<HashMap<String, f64>>,
    total_market_cap: Option<HashMap<String, f64>>,
}

impl GlobalResponse {
    /// Dominance of `asset` (lowercase CoinGecko id, e.g. "btc").
    ///
    /// A missing breakdown or asset key is an error; an explicit 0 is valid.
    pub(crate) fn into_snapshot(self, asset: &str) -> Result<GlobalMarketSnapshot> {
        let data = self.data.context("CoinGecko global response has no data")?;
        let dominance_percent = data
            .market_cap_percentage
            .as_ref()
            .context("CoinGecko global response has no market_cap_percentage")?
            .get(asset)
            .copied()
            .with_context(|| format!("No market cap percentage for {}", asset))?;

        if !dominance_percent.is_finite() {
            anyhow::bail!("Dominance for {} is not a finite number", asset);
        }

        Ok(GlobalMarketSnapshot {
            dominance_percent,
            total_market_cap_usd: data
                .total_market_cap
                .as_ref()
                .and_then(|caps| caps.get("usd").copied()),
        })
    }
}

pub struct CoinGeckoGlobalSource {
    client: ClientWithMiddleware,
    base_url: String,
    asset: String,
}

impl CoinGeckoGlobalSource {
    pub fn new(client: ClientWithMiddleware, base_url: String, asset: String) -> Self {
        Self {
            client,
            base_url,
            asset: asset.to_lowercase(),
        }
    }
}

#[async_trait]
impl DominanceSource for CoinGeckoGlobalSource {
    async fn fetch_global(&self) -> Result<GlobalMarketSnapshot> {
        let url = join_url(&self.base_url, "api/v3/global");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch global stats from CoinGecko")?;

        if !response.status().is_success() {
            anyhow::bail!("CoinGecko global returned status: {}", response.status());
        }

        let body: GlobalResponse = response
            .json()
            .await
            .context("Failed to parse CoinGecko global response")?;

        let snapshot = body.into_snapshot(&self.asset)?;
        debug!("CoinGecko {} dominance: {:.2}%", self.asset, snapshot.dominance_percent);
        Ok(snapshot)
    }
}
