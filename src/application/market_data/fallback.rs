//! Synthetic assessments for demo mode and for when live data is switched off.
//!
//! Values follow the trading session of the current UTC hour with a slow
//! intra-hour wave and random noise on top. The random source is injected so
//! a fixed seed reproduces the same output.

use crate::domain::market::assessment::SENTIMENT_RANGE;
use crate::domain::market::{MarketAssessment, MarketRegime, SourceStatus};
use chrono::{DateTime, Timelike, Utc};
use rand::Rng;
use std::f64::consts::TAU;

const TIME_WAVE_AMPLITUDE: f64 = 2.0;
const NOISE_SPAN: f64 = 15.0;

const VOLATILITY_FLOOR: f64 = 0.9;
const VOLATILITY_SPAN: f64 = 1.1;

const CONFIDENCE_FLOOR: f64 = 65.0;
const CONFIDENCE_SPAN: f64 = 20.0;

/// Trading session active at a given UTC hour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradingSession {
    Us,
    Europe,
    Asia,
}

impl TradingSession {
    pub fn at_hour(hour: u32) -> Self {
        match hour {
            14..=21 => Self::Us,
            8..=13 => Self::Europe,
            _ => Self::Asia,
        }
    }

    pub fn base_sentiment(&self) -> f64 {
        match self {
            Self::Us => 60.0,
            Self::Europe => 55.0,
            Self::Asia => 48.0,
        }
    }
}

pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn generate<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> MarketAssessment {
        let session = TradingSession::at_hour(now.hour());
        let time_wave = (f64::from(now.minute()) / 60.0 * TAU).sin() * TIME_WAVE_AMPLITUDE;
        let noise = (rng.random::<f64>() - 0.5) * NOISE_SPAN;

        let sentiment = round_to(
            (session.base_sentiment() + time_wave + noise).clamp(SENTIMENT_RANGE.0, SENTIMENT_RANGE.1),
            1,
        );
        let volatility = round_to(VOLATILITY_FLOOR + rng.random::<f64>() * VOLATILITY_SPAN, 2);
        let confidence = (CONFIDENCE_FLOOR + rng.random::<f64>() * CONFIDENCE_SPAN).round();

        MarketAssessment {
            sentiment,
            volatility,
            confidence,
            regime: MarketRegime::classify(sentiment, volatility),
            generated_at: now,
            data_sources: SourceStatus::all_offline(),
            synthetic: true,
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_same_seed_same_output() {
        let now = at(15, 20);
        let a = FallbackGenerator::generate(now, &mut StdRng::seed_from_u64(42));
        let b = FallbackGenerator::generate(now, &mut StdRng::seed_from_u64(42));

        assert_eq!(a, b);
    }

    #[test]
    fn test_output_bounds_and_flags() {
        let mut rng = StdRng::seed_from_u64(7);

        for hour in 0..24 {
            for minute in [0, 15, 30, 45] {
                let a = FallbackGenerator::generate(at(hour, minute), &mut rng);

                assert!((0.0..=100.0).contains(&a.sentiment));
                assert!((0.9..=2.0).contains(&a.volatility));
                assert!((65.0..=85.0).contains(&a.confidence));
                assert_eq!(a.confidence.fract(), 0.0);
                assert!(a.synthetic);
                assert_eq!(a.data_sources, SourceStatus::all_offline());
                assert_eq!(a.regime, MarketRegime::classify(a.sentiment, a.volatility));
            }
        }
    }

    #[test]
    fn test_sentiment_stays_near_session_base() {
        let mut rng = StdRng::seed_from_u64(99);

        for (hour, base) in [(3, 48.0), (9, 55.0), (16, 60.0)] {
            for _ in 0..50 {
                let a = FallbackGenerator::generate(at(hour, 0), &mut rng);
                // minute 0 has no wave; noise spans +-7.5
                assert!((a.sentiment - base).abs() <= 7.5 + 0.05, "{} at {}h", a.sentiment, hour);
            }
        }
    }

    #[test]
    fn test_session_boundaries() {
        assert_eq!(TradingSession::at_hour(7), TradingSession::Asia);
        assert_eq!(TradingSession::at_hour(8), TradingSession::Europe);
        assert_eq!(TradingSession::at_hour(13), TradingSession::Europe);
        assert_eq!(TradingSession::at_hour(14), TradingSession::Us);
        assert_eq!(TradingSession::at_hour(21), TradingSession::Us);
        assert_eq!(TradingSession::at_hour(22), TradingSession::Asia);
    }

    #[test]
    fn test_reported_values_are_rounded() {
        let a = FallbackGenerator::generate(at(11, 37), &mut StdRng::seed_from_u64(3));

        assert_eq!(round_to(a.sentiment, 1), a.sentiment);
        assert_eq!(round_to(a.volatility, 2), a.volatility);
    }
}
