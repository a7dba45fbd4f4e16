use super::market_regime::MarketRegime;
use super::signals::SourceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SENTIMENT_RANGE: (f64, f64) = (0.0, 100.0);
pub const VOLATILITY_RANGE: (f64, f64) = (0.5, 3.0);
pub const CONFIDENCE_RANGE: (f64, f64) = (30.0, 100.0);

/// Result of one evaluation cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAssessment {
    pub sentiment: f64,
    pub volatility: f64,
    pub confidence: f64,
    #[serde(rename = "marketRegime")]
    pub regime: MarketRegime,
    pub generated_at: DateTime<Utc>,
    pub data_sources: SourceStatus,
    /// Set only on demo output, never on live data
    pub synthetic: bool,
}

impl MarketAssessment {
    pub fn is_live(&self) -> bool {
        !self.synthetic
    }
}
