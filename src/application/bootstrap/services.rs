use std::sync::Arc;

use crate::application::bootstrap::persistence::PersistenceHandle;
use crate::application::licensing::{LicenseService, WebhookProcessor};
use crate::application::market_data::SignalCollector;
use crate::application::market_feed::{FeedSettings, MarketFeed};
use crate::config::Config;
use crate::infrastructure::binance::BinanceTickerSource;
use crate::infrastructure::coingecko::CoinGeckoGlobalSource;
use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::core::http_client_factory::join_url;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::proxy::UpstreamProxy;
use crate::infrastructure::sentiment::AlternativeMeFearGreedSource;

/// Pass-through clients for the widget's proxy routes
pub struct ProxyHandle {
    pub binance: UpstreamProxy,
    pub coingecko: UpstreamProxy,
    pub alternative_me: UpstreamProxy,
}

pub struct ServicesHandle {
    pub market_feed: Arc<MarketFeed>,
    pub license_service: Arc<LicenseService>,
    pub webhook: Arc<WebhookProcessor>,
    pub proxies: Arc<ProxyHandle>,
}

pub struct ServicesBootstrap;

impl ServicesBootstrap {
    pub fn init(
        config: &Config,
        persistence: &PersistenceHandle,
        metrics: Option<Metrics>,
    ) -> ServicesHandle {
        let upstream = &config.upstream;
        // One pooled client shared by every upstream adapter
        let client = HttpClientFactory::create_client(&upstream.http_settings());

        // 1. Upstream sources
        let mut collector = SignalCollector::new(
            Arc::new(BinanceTickerSource::new(
                client.clone(),
                upstream.binance_base_url.clone(),
                upstream.ticker_symbol.clone(),
            )),
            Arc::new(CoinGeckoGlobalSource::new(
                client.clone(),
                upstream.coingecko_base_url.clone(),
                upstream.dominance_asset.clone(),
            )),
            Arc::new(AlternativeMeFearGreedSource::new(
                client.clone(),
                upstream.alternative_me_base_url.clone(),
            )),
        );
        if let Some(metrics) = &metrics {
            collector = collector.with_metrics(metrics.clone());
        }

        // 2. Licensing
        let license_service = Arc::new(LicenseService::new(
            persistence.license_repository.clone(),
            config.license.call_limits,
        ));
        let webhook = Arc::new(WebhookProcessor::new(
            config.license.webhook_secret.clone(),
            license_service.clone(),
        ));

        // 3. Feed
        let mut market_feed = MarketFeed::new(
            collector,
            license_service.clone(),
            FeedSettings {
                live_data_enabled: config.server.live_data_enabled,
                require_license: config.license.require_license,
            },
            config.server.fallback_seed,
        );
        if let Some(metrics) = metrics {
            market_feed = market_feed.with_metrics(metrics);
        }

        let proxies = ProxyHandle {
            binance: UpstreamProxy::new(
                client.clone(),
                "Binance",
                join_url(&upstream.binance_base_url, "api/v3"),
            ),
            coingecko: UpstreamProxy::new(
                client.clone(),
                "CoinGecko",
                join_url(&upstream.coingecko_base_url, "api/v3"),
            ),
            alternative_me: UpstreamProxy::new(
                client,
                "Alternative.me",
                upstream.alternative_me_base_url.clone(),
            ),
        };

        ServicesHandle {
            market_feed: Arc::new(market_feed),
            license_service,
            webhook,
            proxies: Arc::new(proxies),
        }
    }
}
