//! Request-level orchestration of the market-data endpoint.
//!
//! Decides between live and synthetic output and applies license gating:
//!
//! | live data | key     | require license | result                          |
//! |-----------|---------|-----------------|---------------------------------|
//! | off       | any     | any             | synthetic                       |
//! | on        | none    | yes             | synthetic demo                  |
//! | on        | none    | no              | live, no license metadata       |
//! | on        | present | any             | license + quota, then live      |

use crate::application::licensing::{LicenseService, QuotaDecision};
use crate::application::market_data::{FallbackGenerator, SentimentAggregator, SignalCollector};
use crate::domain::errors::LicenseError;
use crate::domain::license::LicenseTier;
use crate::domain::market::MarketAssessment;
use crate::infrastructure::observability::Metrics;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub const DEMO_MESSAGE: &str = "Demo mode: provide a license key for live data";
pub const UNAVAILABLE_MESSAGE: &str = "Live data unavailable: showing simulated values";

/// License usage attached to gated responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicenseUsage {
    pub tier: LicenseTier,
    pub calls_today: u32,
    pub calls_limit: u32,
}

#[derive(Debug, Clone)]
pub struct FeedResponse {
    pub assessment: MarketAssessment,
    /// Explanation shown next to synthetic data
    pub message: Option<&'static str>,
    pub usage: Option<LicenseUsage>,
}

impl FeedResponse {
    pub fn is_demo(&self) -> bool {
        self.assessment.synthetic
    }
}

/// Gating switches read from configuration
#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    pub live_data_enabled: bool,
    pub require_license: bool,
}

pub struct MarketFeed {
    collector: SignalCollector,
    licenses: Arc<LicenseService>,
    settings: FeedSettings,
    rng: Mutex<StdRng>,
    metrics: Option<Metrics>,
}

impl MarketFeed {
    /// `fallback_seed` fixes the demo generator's output sequence
    pub fn new(
        collector: SignalCollector,
        licenses: Arc<LicenseService>,
        settings: FeedSettings,
        fallback_seed: Option<u64>,
    ) -> Self {
        let rng = match fallback_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            collector,
            licenses,
            settings,
            rng: Mutex::new(rng),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn evaluate(&self, license_key: Option<&str>) -> Result<FeedResponse, LicenseError> {
        let license_key = license_key.map(str::trim).filter(|k| !k.is_empty());

        if !self.settings.live_data_enabled {
            debug!("MarketFeed: live data disabled, serving synthetic assessment");
            return Ok(self.synthetic("fallback", UNAVAILABLE_MESSAGE));
        }

        let Some(raw_key) = license_key else {
            if self.settings.require_license {
                self.count_license_check("demo");
                return Ok(self.synthetic("demo", DEMO_MESSAGE));
            }
            return Ok(FeedResponse {
                assessment: self.live().await,
                message: None,
                usage: None,
            });
        };

        let license = match self.licenses.resolve_license(raw_key).await {
            Ok(license) => license,
            Err(e) => {
                self.count_license_check("rejected");
                info!("MarketFeed: license rejected: {}", e);
                return Err(e);
            }
        };

        let usage = match self.licenses.check_and_consume_quota(&license).await? {
            QuotaDecision::Allowed { calls_today, limit } => LicenseUsage {
                tier: license.plan,
                calls_today,
                calls_limit: limit,
            },
            QuotaDecision::Denied { calls_today, limit } => {
                self.count_license_check("quota_exceeded");
                return Err(LicenseError::QuotaExceeded { calls_today, limit });
            }
        };
        self.count_license_check("valid");

        Ok(FeedResponse {
            assessment: self.live().await,
            message: None,
            usage: Some(usage),
        })
    }

    async fn live(&self) -> MarketAssessment {
        let bundle = self.collector.collect().await;
        let assessment = SentimentAggregator::aggregate(&bundle, Utc::now());

        if let Some(metrics) = &self.metrics {
            metrics.record_assessment("live", &assessment);
        }
        assessment
    }

    fn synthetic(&self, kind: &str, message: &'static str) -> FeedResponse {
        let now = Utc::now();
        let assessment = match self.rng.lock() {
            Ok(mut rng) => FallbackGenerator::generate(now, &mut *rng),
            Err(poisoned) => FallbackGenerator::generate(now, &mut *poisoned.into_inner()),
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_assessment(kind, &assessment);
        }

        FeedResponse {
            assessment,
            message: Some(message),
            usage: None,
        }
    }

    fn count_license_check(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_license_check(outcome);
        }
    }
}
