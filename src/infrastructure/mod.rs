pub mod binance;
pub mod coingecko;
pub mod core;
pub mod observability;
pub mod persistence;
pub mod proxy;
pub mod repositories;
pub mod sentiment;

pub use repositories::InMemoryLicenseRepository;
