//! Blends a [`SignalBundle`] into a [`MarketAssessment`].
//!
//! Signals are applied in a fixed order on a running score that starts at
//! the neutral baseline. A missing signal skips its step entirely.

use crate::domain::market::assessment::{CONFIDENCE_RANGE, SENTIMENT_RANGE, VOLATILITY_RANGE};
use crate::domain::market::{MarketAssessment, MarketRegime, SignalBundle};
use chrono::{DateTime, Utc};

const BASELINE_SENTIMENT: f64 = 50.0;
const BASELINE_VOLATILITY: f64 = 1.0;

const FEAR_GREED_WEIGHT: f64 = 0.4;
const PRICE_WEIGHT: f64 = 0.3;
const DOMINANCE_WEIGHT: f64 = 0.3;

/// Points of price score per percent of 24h change
const PRICE_SCORE_SLOPE: f64 = 2.0;

const SOURCE_COUNT: f64 = 3.0;

pub struct SentimentAggregator;

impl SentimentAggregator {
    pub fn aggregate(bundle: &SignalBundle, generated_at: DateTime<Utc>) -> MarketAssessment {
        let sentiment = Self::sentiment(bundle);
        let volatility = Self::volatility(bundle.price_change_percent());
        let confidence = Self::confidence(bundle.present_count());

        MarketAssessment {
            sentiment,
            volatility,
            confidence,
            regime: MarketRegime::classify(sentiment, volatility),
            generated_at,
            data_sources: bundle.source_status(),
            synthetic: false,
        }
    }

    pub fn sentiment(bundle: &SignalBundle) -> f64 {
        let mut score = BASELINE_SENTIMENT;

        if let Some(fg) = bundle.fear_greed_value() {
            score = score * (1.0 - FEAR_GREED_WEIGHT) + f64::from(fg) * FEAR_GREED_WEIGHT;
        }

        if let Some(pc) = bundle.price_change_percent() {
            let price_score = BASELINE_SENTIMENT + pc * PRICE_SCORE_SLOPE;
            score = score * (1.0 - PRICE_WEIGHT) + price_score * PRICE_WEIGHT;
        }

        if let Some(dominance) = bundle.btc_dominance() {
            score = score * (1.0 - DOMINANCE_WEIGHT) + dominance_score(dominance) * DOMINANCE_WEIGHT;
        }

        score.clamp(SENTIMENT_RANGE.0, SENTIMENT_RANGE.1)
    }

    pub fn volatility(price_change_percent: Option<f64>) -> f64 {
        let multiplier = match price_change_percent.map(f64::abs) {
            Some(pc) if pc > 10.0 => 2.5,
            Some(pc) if pc > 5.0 => 2.0,
            Some(pc) if pc > 3.0 => 1.5,
            Some(pc) if pc > 1.0 => 1.2,
            _ => BASELINE_VOLATILITY,
        };

        multiplier.clamp(VOLATILITY_RANGE.0, VOLATILITY_RANGE.1)
    }

    pub fn confidence(online_sources: usize) -> f64 {
        (online_sources as f64 / SOURCE_COUNT * 100.0).clamp(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1)
    }
}

/// Dominance bands: very high dominance reads as risk-off, the 45-55 band
/// as healthy.
fn dominance_score(dominance: f64) -> f64 {
    if dominance > 65.0 {
        30.0
    } else if dominance > 55.0 {
        60.0
    } else if dominance > 45.0 {
        70.0
    } else if dominance > 35.0 {
        40.0
    } else {
        20.0
    }
}
