use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Published Fear & Greed classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentClassification {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl fmt::Display for SentimentClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtremeFear => write!(f, "Extreme Fear"),
            Self::Fear => write!(f, "Fear"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Greed => write!(f, "Greed"),
            Self::ExtremeGreed => write!(f, "Extreme Greed"),
        }
    }
}

impl SentimentClassification {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=24 => Self::ExtremeFear,
            25..=44 => Self::Fear,
            45..=55 => Self::Neutral,
            56..=75 => Self::Greed,
            _ => Self::ExtremeGreed,
        }
    }

    /// Parse the index's own text label, e.g. "Extreme Greed"
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "extreme fear" => Some(Self::ExtremeFear),
            "fear" => Some(Self::Fear),
            "neutral" => Some(Self::Neutral),
            "greed" => Some(Self::Greed),
            "extreme greed" => Some(Self::ExtremeGreed),
            _ => None,
        }
    }
}

/// One entry of the Fear & Greed index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreedReading {
    pub value: u8, // 0-100
    pub classification: SentimentClassification,
    pub timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_accepts_published_names() {
        assert_eq!(
            SentimentClassification::from_label("Extreme Greed"),
            Some(SentimentClassification::ExtremeGreed)
        );
        assert_eq!(
            SentimentClassification::from_label(" fear "),
            Some(SentimentClassification::Fear)
        );
        assert_eq!(SentimentClassification::from_label("Bullish"), None);
    }

    #[test]
    fn test_from_score_bands() {
        assert_eq!(SentimentClassification::from_score(24), SentimentClassification::ExtremeFear);
        assert_eq!(SentimentClassification::from_score(50), SentimentClassification::Neutral);
        assert_eq!(SentimentClassification::from_score(76), SentimentClassification::ExtremeGreed);
    }
}
