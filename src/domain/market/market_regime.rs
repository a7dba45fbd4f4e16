use serde::{Deserialize, Serialize};
use std::fmt;

/// Volatility above which the high-volatility branch of the table applies
const HIGH_VOLATILITY: f64 = 2.0;

/// Discrete market mood derived from (sentiment, volatility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketRegime {
    #[serde(rename = "PARABOLIC BULL")]
    ParabolicBull,
    #[serde(rename = "VOLATILE NEUTRAL")]
    VolatileNeutral,
    #[serde(rename = "CAPITULATION")]
    Capitulation,
    #[serde(rename = "STRONG BULLISH")]
    StrongBullish,
    #[serde(rename = "BULLISH")]
    Bullish,
    #[serde(rename = "SLIGHTLY BULLISH")]
    SlightlyBullish,
    #[serde(rename = "SLIGHTLY BEARISH")]
    SlightlyBearish,
    #[serde(rename = "BEARISH")]
    Bearish,
    #[serde(rename = "STRONG BEARISH")]
    StrongBearish,
}

impl MarketRegime {
    /// Classify a market state. First matching row wins:
    ///
    /// | condition                       | regime           |
    /// |---------------------------------|------------------|
    /// | volatility > 2.0, sentiment > 70 | PARABOLIC BULL   |
    /// | volatility > 2.0, sentiment > 55 | VOLATILE NEUTRAL |
    /// | volatility > 2.0                 | CAPITULATION     |
    /// | sentiment > 70                   | STRONG BULLISH   |
    /// | sentiment > 60                   | BULLISH          |
    /// | sentiment > 50                   | SLIGHTLY BULLISH |
    /// | sentiment > 40                   | SLIGHTLY BEARISH |
    /// | sentiment > 30                   | BEARISH          |
    /// | otherwise                        | STRONG BEARISH   |
    pub fn classify(sentiment: f64, volatility: f64) -> Self {
        if volatility > HIGH_VOLATILITY {
            return if sentiment > 70.0 {
                Self::ParabolicBull
            } else if sentiment > 55.0 {
                Self::VolatileNeutral
            } else {
                Self::Capitulation
            };
        }

        if sentiment > 70.0 {
            Self::StrongBullish
        } else if sentiment > 60.0 {
            Self::Bullish
        } else if sentiment > 50.0 {
            Self::SlightlyBullish
        } else if sentiment > 40.0 {
            Self::SlightlyBearish
        } else if sentiment > 30.0 {
            Self::Bearish
        } else {
            Self::StrongBearish
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ParabolicBull => "PARABOLIC BULL",
            Self::VolatileNeutral => "VOLATILE NEUTRAL",
            Self::Capitulation => "CAPITULATION",
            Self::StrongBullish => "STRONG BULLISH",
            Self::Bullish => "BULLISH",
            Self::SlightlyBullish => "SLIGHTLY BULLISH",
            Self::SlightlyBearish => "SLIGHTLY BEARISH",
            Self::Bearish => "BEARISH",
            Self::StrongBearish => "STRONG BEARISH",
        }
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
