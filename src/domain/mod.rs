// Market sentiment domain
pub mod market;

// License keys, tiers and records
pub mod license;

// Fear & Greed index types
pub mod sentiment;

// Port interfaces
pub mod ports;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
