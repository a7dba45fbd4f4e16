//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementation of `domain::repositories::LicenseRepository`.
//!
//! # Features
//!
//! - **Thread-safe**: Uses `Arc<RwLock>` for concurrent access
//! - **TTL**: each license carries a storage deadline checked on read
//! - **Testing**: Ideal for unit tests and development
//!
//! # Limitations
//!
//! - Data is lost on application restart
//! - No persistence across multiple instances
//!
//! Set `DATABASE_URL` to switch to the SQLite repository.

use crate::domain::license::{License, LicenseKey};
use crate::domain::repositories::LicenseRepository;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

struct StoredLicense {
    license: License,
    stored_until: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct InMemoryLicenseRepository {
    licenses: Arc<RwLock<HashMap<LicenseKey, StoredLicense>>>,
    calls: Arc<RwLock<HashMap<(LicenseKey, NaiveDate), u32>>>,
}

impl InMemoryLicenseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of licenses still within their TTL
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        self.licenses
            .read()
            .await
            .values()
            .filter(|stored| stored.stored_until > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LicenseRepository for InMemoryLicenseRepository {
    async fn save(&self, license: &License, ttl: Duration) -> Result<()> {
        self.licenses.write().await.insert(
            license.license_key.clone(),
            StoredLicense {
                license: license.clone(),
                stored_until: Utc::now() + ttl,
            },
        );
        Ok(())
    }

    async fn find(&self, key: &LicenseKey) -> Result<Option<License>> {
        let now = Utc::now();
        let mut licenses = self.licenses.write().await;

        match licenses.get(key) {
            Some(stored) if stored.stored_until > now => Ok(Some(stored.license.clone())),
            Some(_) => {
                licenses.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn increment_calls(&self, key: &LicenseKey, day: NaiveDate) -> Result<u32> {
        let count = {
            let mut calls = self.calls.write().await;
            calls.retain(|(k, d), _| k != key || *d >= day);
            let counter = calls.entry((key.clone(), day)).or_insert(0);
            *counter += 1;
            *counter
        };

        if let Some(stored) = self.licenses.write().await.get_mut(key) {
            stored.license.api_calls_today = count;
            stored.license.last_api_call = Some(Utc::now());
        }

        Ok(count)
    }

    async fn calls_on(&self, key: &LicenseKey, day: NaiveDate) -> Result<u32> {
        Ok(self
            .calls
            .read()
            .await
            .get(&(key.clone(), day))
            .copied()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::license::LicenseTier;

    fn sample_license() -> License {
        License::issue(
            "buyer@example.com",
            LicenseKey::parse("MC-FFFFFFFFFFFF").unwrap(),
            LicenseTier::Basic,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryLicenseRepository::new();
        let license = sample_license();

        repo.save(&license, Duration::days(730)).await.unwrap();

        assert_eq!(repo.find(&license.license_key).await.unwrap(), Some(license));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiry_evicts_on_read() {
        let repo = InMemoryLicenseRepository::new();
        let license = sample_license();

        repo.save(&license, Duration::milliseconds(-1)).await.unwrap();

        assert_eq!(repo.find(&license.license_key).await.unwrap(), None);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_increment_updates_counter_and_record() {
        let repo = InMemoryLicenseRepository::new();
        let license = sample_license();
        let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        repo.save(&license, Duration::days(1)).await.unwrap();

        assert_eq!(repo.increment_calls(&license.license_key, day).await.unwrap(), 1);
        assert_eq!(repo.increment_calls(&license.license_key, day).await.unwrap(), 2);
        assert_eq!(repo.calls_on(&license.license_key, day).await.unwrap(), 2);

        let stored = repo.find(&license.license_key).await.unwrap().unwrap();
        assert_eq!(stored.api_calls_today, 2);
        assert!(stored.last_api_call.is_some());
    }

    #[tokio::test]
    async fn test_new_day_drops_previous_counters() {
        let repo = InMemoryLicenseRepository::new();
        let license = sample_license();
        let other = LicenseKey::parse("MC-000000000001").unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2025, 1, 14).unwrap();

        repo.increment_calls(&license.license_key, monday).await.unwrap();
        repo.increment_calls(&other, monday).await.unwrap();
        assert_eq!(repo.increment_calls(&license.license_key, tuesday).await.unwrap(), 1);

        assert_eq!(repo.calls_on(&license.license_key, monday).await.unwrap(), 0);
        assert_eq!(repo.calls_on(&other, monday).await.unwrap(), 1);
        assert_eq!(repo.calls.read().await.len(), 2);
    }
}
