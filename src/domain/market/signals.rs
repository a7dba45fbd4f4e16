//! Partial upstream signals gathered for one evaluation.
//!
//! Every numeric field is optional: a `None` means the source failed or
//! returned something unusable, and downstream scoring must skip it rather
//! than substitute a neutral value.

use serde::{Deserialize, Serialize};
use std::fmt;

const FEAR_GREED_MAX: u8 = 100;

/// Upstream data sources feeding the sentiment score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    Ticker,
    Dominance,
    FearGreed,
}

impl DataSource {
    pub const ALL: [DataSource; 3] = [Self::Ticker, Self::Dominance, Self::FearGreed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Dominance => "dominance",
            Self::FearGreed => "fearGreed",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceHealth {
    Online,
    Offline,
}

impl SourceHealth {
    pub fn from_present<T>(value: &Option<T>) -> Self {
        if value.is_some() {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Per-source availability, always fully populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceStatus {
    pub ticker: SourceHealth,
    pub dominance: SourceHealth,
    pub fear_greed: SourceHealth,
}

impl SourceStatus {
    pub fn all_offline() -> Self {
        Self {
            ticker: SourceHealth::Offline,
            dominance: SourceHealth::Offline,
            fear_greed: SourceHealth::Offline,
        }
    }

    pub fn get(&self, source: DataSource) -> SourceHealth {
        match source {
            DataSource::Ticker => self.ticker,
            DataSource::Dominance => self.dominance,
            DataSource::FearGreed => self.fear_greed,
        }
    }

    pub fn online_count(&self) -> usize {
        DataSource::ALL
            .iter()
            .filter(|source| self.get(**source).is_online())
            .count()
    }
}

/// Signals collected for a single evaluation cycle.
///
/// Built only through [`SignalBundle::new`], which drops unusable readings
/// (non-finite numbers, fear/greed above 100) and then derives
/// `source_status` from what is left so the two never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBundle {
    price_change_percent: Option<f64>,
    btc_dominance: Option<f64>,
    fear_greed_value: Option<u8>,
    source_status: SourceStatus,
}

impl SignalBundle {
    pub fn new(
        price_change_percent: Option<f64>,
        btc_dominance: Option<f64>,
        fear_greed_value: Option<u8>,
    ) -> Self {
        let price_change_percent = price_change_percent.filter(|v| v.is_finite());
        let btc_dominance = btc_dominance.filter(|v| v.is_finite());
        let fear_greed_value = fear_greed_value.filter(|v| *v <= FEAR_GREED_MAX);

        let source_status = SourceStatus {
            ticker: SourceHealth::from_present(&price_change_percent),
            dominance: SourceHealth::from_present(&btc_dominance),
            fear_greed: SourceHealth::from_present(&fear_greed_value),
        };

        Self {
            price_change_percent,
            btc_dominance,
            fear_greed_value,
            source_status,
        }
    }

    /// Bundle for a cycle where every source failed
    pub fn empty() -> Self {
        Self::new(None, None, None)
    }

    pub fn price_change_percent(&self) -> Option<f64> {
        self.price_change_percent
    }

    pub fn btc_dominance(&self) -> Option<f64> {
        self.btc_dominance
    }

    pub fn fear_greed_value(&self) -> Option<u8> {
        self.fear_greed_value
    }

    pub fn source_status(&self) -> SourceStatus {
        self.source_status
    }

    pub fn present_count(&self) -> usize {
        self.source_status.online_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_presence() {
        let bundle = SignalBundle::new(Some(1.5), None, Some(40));
        let status = bundle.source_status();

        assert_eq!(status.ticker, SourceHealth::Online);
        assert_eq!(status.dominance, SourceHealth::Offline);
        assert_eq!(status.fear_greed, SourceHealth::Online);
        assert_eq!(bundle.present_count(), 2);
    }

    #[test]
    fn test_zero_dominance_counts_as_present() {
        let bundle = SignalBundle::new(None, Some(0.0), None);
        assert_eq!(bundle.btc_dominance(), Some(0.0));
        assert!(bundle.source_status().dominance.is_online());
    }

    #[test]
    fn test_unusable_readings_are_absent() {
        let bundle = SignalBundle::new(Some(f64::NAN), Some(f64::INFINITY), Some(101));

        assert_eq!(bundle.price_change_percent(), None);
        assert_eq!(bundle.btc_dominance(), None);
        assert_eq!(bundle.fear_greed_value(), None);
        assert_eq!(bundle.source_status(), SourceStatus::all_offline());
        assert_eq!(bundle.present_count(), 0);

        let edge = SignalBundle::new(Some(f64::NEG_INFINITY), None, Some(100));
        assert!(!edge.source_status().ticker.is_online());
        assert_eq!(edge.fear_greed_value(), Some(100));
    }

    #[test]
    fn test_status_serializes_with_wire_names() {
        let json = serde_json::to_value(SignalBundle::empty().source_status()).unwrap();
        assert_eq!(json["ticker"], "offline");
        assert_eq!(json["dominance"], "offline");
        assert_eq!(json["fearGreed"], "offline");
    }
}
