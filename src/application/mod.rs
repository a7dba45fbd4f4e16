// Wiring from configuration to running services
pub mod bootstrap;

// License lookup, quota and payment webhooks
pub mod licensing;

// Signal collection, aggregation and synthetic fallback
pub mod market_data;

// Request-level gating of the market-data feed
pub mod market_feed;
