//! Concurrent collection of the three upstream signals.
//!
//! All fetches run to completion side by side; a failing source only blanks
//! its own field in the resulting [`SignalBundle`].

use crate::domain::market::{DataSource, SignalBundle};
use crate::domain::ports::{DominanceSource, FearGreedSource, TickerSource};
use crate::infrastructure::observability::Metrics;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

pub struct SignalCollector {
    ticker: Arc<dyn TickerSource>,
    dominance: Arc<dyn DominanceSource>,
    fear_greed: Arc<dyn FearGreedSource>,
    metrics: Option<Metrics>,
}

impl SignalCollector {
    pub fn new(
        ticker: Arc<dyn TickerSource>,
        dominance: Arc<dyn DominanceSource>,
        fear_greed: Arc<dyn FearGreedSource>,
    ) -> Self {
        Self {
            ticker,
            dominance,
            fear_greed,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Fetch every source and keep whatever succeeded. Never fails.
    pub async fn collect(&self) -> SignalBundle {
        let (ticker, global, fear_greed) = futures::join!(
            self.timed(DataSource::Ticker, self.ticker.fetch_ticker()),
            self.timed(DataSource::Dominance, self.dominance.fetch_global()),
            self.timed(DataSource::FearGreed, self.fear_greed.fetch_latest()),
        );

        let bundle = SignalBundle::new(
            ticker.map(|t| t.price_change_percent),
            global.map(|g| g.dominance_percent),
            fear_greed.map(|r| r.value),
        );

        debug!(
            "SignalCollector: {}/3 sources online (pc={:?}, dom={:?}, fg={:?})",
            bundle.present_count(),
            bundle.price_change_percent(),
            bundle.btc_dominance(),
            bundle.fear_greed_value()
        );

        if let Some(metrics) = &self.metrics {
            metrics.record_sources(&bundle.source_status());
        }

        bundle
    }

    async fn timed<T, F>(&self, source: DataSource, fetch: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        let outcome = fetch.await;

        if let Some(metrics) = &self.metrics {
            metrics.observe_upstream_latency(source, started.elapsed().as_secs_f64());
        }

        match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("SignalCollector: {} source unavailable: {:#}", source, e);
                None
            }
        }
    }
}
