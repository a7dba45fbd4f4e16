//! Pass-through access to the upstream APIs for the widget's proxy routes.
//!
//! Unlike the typed sources, the proxy hands back the upstream JSON verbatim.
//! Static fallback documents cover the two upstreams whose outage the widget
//! can tolerate.

use crate::domain::errors::UpstreamError;
use crate::infrastructure::core::http_client_factory::join_url;
use chrono::{DateTime, Duration, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::{Value, json};
use tracing::warn;

pub struct UpstreamProxy {
    client: ClientWithMiddleware,
    name: String,
    base_url: String,
}

impl UpstreamProxy {
    pub fn new(client: ClientWithMiddleware, name: impl Into<String>, base_url: String) -> Self {
        Self {
            client,
            name: name.into(),
            base_url,
        }
    }

    /// GET `{base_url}/{endpoint}` and return the decoded JSON body
    pub async fn fetch_json(&self, endpoint: &str) -> Result<Value, UpstreamError> {
        if !is_relative_endpoint(endpoint) {
            return Err(self.transport_error(format!("rejected endpoint {:?}", endpoint)));
        }

        let url = join_url(&self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} API error: {} for {}", self.name, status, endpoint);
            return Err(UpstreamError::Status {
                source_name: self.name.clone(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| self.transport_error(e.to_string()))
    }

    fn transport_error(&self, reason: String) -> UpstreamError {
        UpstreamError::Transport {
            source_name: self.name.clone(),
            reason,
        }
    }
}

/// Endpoints must stay on the configured host
fn is_relative_endpoint(endpoint: &str) -> bool {
    !endpoint.is_empty()
        && !endpoint.contains("://")
        && !endpoint.starts_with("//")
        && !endpoint.split(['/', '?']).any(|segment| segment == "..")
}

/// Minimal CoinGecko `/global` document served when the real one is down
pub fn fallback_global_document() -> Value {
    json!({
        "data": {
            "active_cryptocurrencies": 8000,
            "total_market_cap": { "usd": 1_600_000_000_000_u64 },
            "market_cap_percentage": { "btc": 52.5 },
            "total_volume": { "usd": 60_000_000_000_u64 },
            "market_cap_change_percentage_24h_usd": 2.5,
        },
        "isFallback": true,
    })
}

const FALLBACK_FEAR_GREED: [(u8, &str); 10] = [
    (65, "Greed"),
    (68, "Greed"),
    (72, "Greed"),
    (70, "Greed"),
    (67, "Neutral"),
    (65, "Neutral"),
    (63, "Neutral"),
    (60, "Fear"),
    (58, "Fear"),
    (55, "Fear"),
];

/// Ten daily Fear & Greed entries ending at `now`, newest first
pub fn fallback_fear_greed_document(now: DateTime<Utc>) -> Value {
    let data: Vec<Value> = FALLBACK_FEAR_GREED
        .iter()
        .enumerate()
        .map(|(i, (value, classification))| {
            json!({
                "value": value.to_string(),
                "value_classification": classification,
                "timestamp": (now - Duration::days(i as i64)).timestamp().to_string(),
            })
        })
        .collect();

    json!({
        "name": "Alternative Fear and Greed Index",
        "data": data,
        "metadata": { "error": "Using fallback data" },
    })
}
