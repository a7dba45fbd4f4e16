//! Repository Pattern Abstractions
//!
//! License records and per-day call counters sit behind [`LicenseRepository`]
//! so the license service never knows which store is in use.
//!
//! # Implementations
//!
//! - `InMemoryLicenseRepository`: `Arc<RwLock>` maps, TTL checked on read
//! - `SqliteLicenseRepository`: sqlx/SQLite, used when `DATABASE_URL` is set
//!
//! # Example
//!
//! ```rust,no_run
//! use marketcube::domain::repositories::LicenseRepository;
//! use marketcube::infrastructure::InMemoryLicenseRepository;
//!
//! # async {
//! let repo = InMemoryLicenseRepository::new();
//! // repo.save(&license, ttl).await?;
//! // let found = repo.find(&license.license_key).await?;
//! # };
//! ```

use crate::domain::license::{License, LicenseKey};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

#[async_trait]
pub trait LicenseRepository: Send + Sync {
    /// Upsert a license, expiring it from storage after `ttl`
    async fn save(&self, license: &License, ttl: Duration) -> Result<()>;

    /// Find a live license by key
    async fn find(&self, key: &LicenseKey) -> Result<Option<License>>;

    /// Increment and return the call counter for `day`.
    ///
    /// Counters for the same key on earlier days are discarded.
    async fn increment_calls(&self, key: &LicenseKey, day: NaiveDate) -> Result<u32>;

    /// Current call counter for `day` (0 when never called)
    async fn calls_on(&self, key: &LicenseKey, day: NaiveDate) -> Result<u32>;
}
