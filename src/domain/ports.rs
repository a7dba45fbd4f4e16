use crate::domain::sentiment::FearGreedReading;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 24h ticker of the reference trading pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub symbol: String,
    pub price_change_percent: f64,
    pub last_price: Option<f64>,
    pub high_price: Option<f64>,
    pub low_price: Option<f64>,
}

/// Global market aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalMarketSnapshot {
    /// Reference asset's share of total market cap, in percent
    pub dominance_percent: f64,
    pub total_market_cap_usd: Option<f64>,
}

// Need async_trait for async functions in traits
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn fetch_ticker(&self) -> Result<TickerSnapshot>;
}

#[async_trait]
pub trait DominanceSource: Send + Sync {
    async fn fetch_global(&self) -> Result<GlobalMarketSnapshot>;
}

#[async_trait]
pub trait FearGreedSource: Send + Sync {
    /// Fetch the most recent index entry
    async fn fetch_latest(&self) -> Result<FearGreedReading>;
}
