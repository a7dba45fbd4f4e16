use crate::domain::ports::FearGreedSource;
use crate::domain::sentiment::{FearGreedReading, SentimentClassification};
use crate::infrastructure::core::http_client_factory::{build_url_with_query, join_url};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct AlternativeMeResponse {
    #[serde(default)]
    data: Vec<AlternativeMeData>,
}

#[derive(Debug, Deserialize)]
struct AlternativeMeData {
    value: String,
    value_classification: Option<String>,
    timestamp: Option<String>,
}

impl AlternativeMeResponse {
    /// First entry of the list, which the API orders newest first
    pub(crate) fn latest(self) -> anyhow::Result<FearGreedReading> {
        let data = self
            .data
            .into_iter()
            .next()
            .context("No sentiment data found in response")?;

        let value: u8 = data
            .value
            .trim()
            .parse()
            .context("Failed to parse sentiment value")?;
        if value > 100 {
            anyhow::bail!("Sentiment value {} outside 0-100", value);
        }

        // Prefer the published label, fall back to our own banding
        let classification = data
            .value_classification
            .as_deref()
            .and_then(SentimentClassification::from_label)
            .unwrap_or_else(|| SentimentClassification::from_score(value));

        let timestamp = data
            .timestamp
            .as_deref()
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

        Ok(FearGreedReading {
            value,
            classification,
            timestamp,
        })
    }
}

pub struct AlternativeMeFearGreedSource {
    client: ClientWithMiddleware,
    base_url: String,
}

impl AlternativeMeFearGreedSource {
    pub fn new(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl FearGreedSource for AlternativeMeFearGreedSource {
    async fn fetch_latest(&self) -> anyhow::Result<FearGreedReading> {
        let url = build_url_with_query(
            &join_url(&self.base_url, "fng/"),
            &[("limit", "1"), ("format", "json")],
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request to Alternative.me")?;

        if !response.status().is_success() {
            anyhow::bail!("Alternative.me API returned status: {}", response.status());
        }

        let body: AlternativeMeResponse = response
            .json()
            .await
            .context("Failed to parse Alternative.me response")?;

        let reading = body.latest()?;
        debug!(
            "Fetched Fear & Greed: {} ({})",
            reading.value, reading.classification
        );
        Ok(reading)
    }
}
