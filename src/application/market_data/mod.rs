// Market data pipeline: collect -> aggregate, with a synthetic fallback
pub mod aggregator;
pub mod collector;
pub mod fallback;

pub use aggregator::SentimentAggregator;
pub use collector::SignalCollector;
pub use fallback::FallbackGenerator;
