//! JSON bodies exchanged with the widget.

use crate::application::market_feed::FeedResponse;
use crate::domain::license::{License, LicenseTier};
use crate::domain::market::palette::{color_for, mood_for};
use crate::domain::market::{MarketRegime, SourceStatus};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataResponse {
    pub sentiment: f64,
    pub volatility: f64,
    pub confidence: f64,
    pub market_regime: MarketRegime,
    /// Unix milliseconds
    pub timestamp: i64,
    pub last_updated: String,
    pub data_sources: SourceStatus,
    pub color: String,
    pub mood: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_demo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_tier: Option<LicenseTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls_today: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls_limit: Option<u32>,
}

impl From<FeedResponse> for MarketDataResponse {
    fn from(response: FeedResponse) -> Self {
        let is_demo = response.is_demo().then_some(true);
        let assessment = response.assessment;

        Self {
            sentiment: assessment.sentiment,
            volatility: assessment.volatility,
            confidence: assessment.confidence,
            market_regime: assessment.regime,
            timestamp: assessment.generated_at.timestamp_millis(),
            last_updated: assessment
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            data_sources: assessment.data_sources,
            color: color_for(assessment.sentiment).to_string(),
            mood: mood_for(assessment.sentiment).label,
            is_demo,
            message: response.message,
            license_tier: response.usage.map(|u| u.tier),
            calls_today: response.usage.map(|u| u.calls_today),
            calls_limit: response.usage.map(|u| u.calls_limit),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketDataQuery {
    pub key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub license_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSummary {
    pub email: String,
    pub plan: LicenseTier,
    pub expires_at: String,
    pub created_at: String,
}

impl From<&License> for LicenseSummary {
    fn from(license: &License) -> Self {
        Self {
            email: license.email.clone(),
            plan: license.plan,
            expires_at: license.expires_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            created_at: license.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResponse {
    pub fn valid(license: &License) -> Self {
        Self {
            valid: true,
            license: Some(license.into()),
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            license: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProxyQuery {
    pub endpoint: Option<String>,
}
