//! Observability for MarketCube
//!
//! Prometheus metrics are kept in a private registry and rendered by the
//! `/metrics` route. Structured logs go through `tracing`.

pub mod metrics;

pub use metrics::Metrics;
