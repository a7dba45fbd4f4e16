//! Prometheus metrics definitions for MarketCube
//!
//! All metrics use the `marketcube_` prefix and are read-only.

use crate::domain::market::{DataSource, MarketAssessment, SourceStatus};
use prometheus::{
    CounterVec, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge, GenericGaugeVec},
};
use std::sync::Arc;

/// Prometheus metrics for the sentiment service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Last live sentiment score (0-100)
    pub sentiment_score: GenericGauge<AtomicF64>,
    /// Last live volatility multiplier
    pub volatility_score: GenericGauge<AtomicF64>,
    /// Last live confidence (30-100)
    pub confidence_score: GenericGauge<AtomicF64>,
    /// Source availability on the last collection (1=online, 0=offline)
    pub source_up: GenericGaugeVec<AtomicF64>,
    /// Upstream fetch latency in seconds
    pub upstream_latency_seconds: HistogramVec,
    /// Assessments served, by kind (live/demo/fallback)
    pub assessments_total: CounterVec,
    /// License checks by outcome
    pub license_checks_total: CounterVec,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let sentiment_score = Gauge::with_opts(Opts::new(
            "marketcube_sentiment_score",
            "Blended market sentiment (0-100)",
        ))?;
        registry.register(Box::new(sentiment_score.clone()))?;

        let volatility_score = Gauge::with_opts(Opts::new(
            "marketcube_volatility_score",
            "Volatility multiplier (0.5-3.0)",
        ))?;
        registry.register(Box::new(volatility_score.clone()))?;

        let confidence_score = Gauge::with_opts(Opts::new(
            "marketcube_confidence_score",
            "Share of upstream sources online (30-100)",
        ))?;
        registry.register(Box::new(confidence_score.clone()))?;

        let source_up = GaugeVec::new(
            Opts::new(
                "marketcube_source_up",
                "Upstream source availability on last collection",
            ),
            &["source"],
        )?;
        registry.register(Box::new(source_up.clone()))?;

        let upstream_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "marketcube_upstream_latency_seconds",
                "Upstream request latency in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["source"],
        )?;
        registry.register(Box::new(upstream_latency_seconds.clone()))?;

        let assessments_total = CounterVec::new(
            Opts::new("marketcube_assessments_total", "Assessments served by kind"),
            &["kind"],
        )?;
        registry.register(Box::new(assessments_total.clone()))?;

        let license_checks_total = CounterVec::new(
            Opts::new("marketcube_license_checks_total", "License checks by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(license_checks_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            sentiment_score,
            volatility_score,
            confidence_score,
            source_up,
            upstream_latency_seconds,
            assessments_total,
            license_checks_total,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn record_sources(&self, status: &SourceStatus) {
        for source in DataSource::ALL {
            let up = if status.get(source).is_online() { 1.0 } else { 0.0 };
            self.source_up.with_label_values(&[source.as_str()]).set(up);
        }
    }

    pub fn observe_upstream_latency(&self, source: DataSource, latency: f64) {
        self.upstream_latency_seconds
            .with_label_values(&[source.as_str()])
            .observe(latency);
    }

    /// Count a served assessment; gauges only track live data
    pub fn record_assessment(&self, kind: &str, assessment: &MarketAssessment) {
        self.assessments_total.with_label_values(&[kind]).inc();
        if assessment.is_live() {
            self.sentiment_score.set(assessment.sentiment);
            self.volatility_score.set(assessment.volatility);
            self.confidence_score.set(assessment.confidence);
        }
    }

    pub fn inc_license_check(&self, outcome: &str) {
        self.license_checks_total.with_label_values(&[outcome]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::{MarketRegime, SignalBundle};
    use chrono::Utc;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_license_check("valid");
        assert!(metrics.render().contains("marketcube_"));
    }

    #[test]
    fn test_source_up_per_source() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let bundle = SignalBundle::new(Some(1.0), None, Some(50));
        metrics.record_sources(&bundle.source_status());

        let output = metrics.render();
        assert!(output.contains("marketcube_source_up{source=\"ticker\"} 1"));
        assert!(output.contains("marketcube_source_up{source=\"dominance\"} 0"));
        assert!(output.contains("marketcube_source_up{source=\"fearGreed\"} 1"));
    }

    #[test]
    fn test_synthetic_assessment_leaves_gauges_alone() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let assessment = MarketAssessment {
            sentiment: 61.0,
            volatility: 1.2,
            confidence: 70.0,
            regime: MarketRegime::Bullish,
            generated_at: Utc::now(),
            data_sources: SourceStatus::all_offline(),
            synthetic: true,
        };

        metrics.record_assessment("demo", &assessment);

        assert_eq!(metrics.sentiment_score.get(), 0.0);
        assert!(metrics.render().contains("marketcube_assessments_total{kind=\"demo\"} 1"));
    }
}
