use crate::domain::errors::LicenseError;
use crate::domain::license::{CallLimits, LICENSE_TTL_DAYS, License, LicenseKey, LicenseTier};
use crate::domain::repositories::LicenseRepository;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a quota check. The call is counted either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed { calls_today: u32, limit: u32 },
    Denied { calls_today: u32, limit: u32 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

pub struct LicenseService {
    repository: Arc<dyn LicenseRepository>,
    limits: CallLimits,
}

impl LicenseService {
    pub fn new(repository: Arc<dyn LicenseRepository>, limits: CallLimits) -> Self {
        Self { repository, limits }
    }

    pub fn generate_license_key(&self) -> LicenseKey {
        LicenseKey::generate()
    }

    pub fn limits(&self) -> CallLimits {
        self.limits
    }

    /// Look up a usable license: well-formed key, stored, active and unexpired
    pub async fn resolve_license(&self, raw_key: &str) -> Result<License, LicenseError> {
        let key = LicenseKey::parse(raw_key.trim())?;

        let license = self
            .repository
            .find(&key)
            .await?
            .ok_or(LicenseError::NotFound)?;

        if !license.is_active {
            return Err(LicenseError::Inactive);
        }
        if license.is_expired(Utc::now()) {
            return Err(LicenseError::Expired);
        }

        Ok(license)
    }

    /// Verification for the public endpoint; an empty key is reported as missing
    pub async fn verify(&self, raw_key: &str) -> Result<License, LicenseError> {
        if raw_key.trim().is_empty() {
            return Err(LicenseError::Missing);
        }
        self.resolve_license(raw_key).await
    }

    /// Count one call against today's allowance for the license's tier
    pub async fn check_and_consume_quota(
        &self,
        license: &License,
    ) -> Result<QuotaDecision, LicenseError> {
        let today = Utc::now().date_naive();
        let calls_today = self
            .repository
            .increment_calls(&license.license_key, today)
            .await?;
        let limit = self.limits.for_tier(license.plan);

        if calls_today > limit {
            warn!(
                "LicenseService: {} over daily limit ({}/{})",
                license.license_key, calls_today, limit
            );
            Ok(QuotaDecision::Denied { calls_today, limit })
        } else {
            Ok(QuotaDecision::Allowed { calls_today, limit })
        }
    }

    pub async fn issue_license(
        &self,
        email: &str,
        plan: LicenseTier,
        key: Option<LicenseKey>,
    ) -> Result<License, LicenseError> {
        let key = key.unwrap_or_else(|| self.generate_license_key());
        let license = License::issue(email, key, plan, Utc::now());

        self.repository
            .save(&license, Duration::days(LICENSE_TTL_DAYS))
            .await?;

        info!(
            "License issued: {} for {} ({})",
            license.license_key, license.email, license.plan
        );
        Ok(license)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryLicenseRepository;

    fn service_with_limits(limits: CallLimits) -> (LicenseService, InMemoryLicenseRepository) {
        let repo = InMemoryLicenseRepository::new();
        (LicenseService::new(Arc::new(repo.clone()), limits), repo)
    }

    fn service() -> (LicenseService, InMemoryLicenseRepository) {
        service_with_limits(CallLimits::default())
    }

    #[tokio::test]
    async fn test_issue_then_resolve() {
        let (service, _) = service();
        let issued = service
            .issue_license("buyer@example.com", LicenseTier::Pro, None)
            .await
            .unwrap();

        let resolved = service
            .resolve_license(issued.license_key.as_str())
            .await
            .unwrap();

        assert_eq!(resolved.email, "buyer@example.com");
        assert_eq!(resolved.plan, LicenseTier::Pro);
        assert!(resolved.is_active);
    }

    #[tokio::test]
    async fn test_resolve_errors() {
        let (service, repo) = service();

        assert!(matches!(
            service.resolve_license("not-a-key").await,
            Err(LicenseError::InvalidFormat)
        ));
        assert!(matches!(
            service.resolve_license("MC-000000000000").await,
            Err(LicenseError::NotFound)
        ));

        let key = LicenseKey::parse("MC-111111111111").unwrap();
        let mut inactive = License::issue("a@b.c", key.clone(), LicenseTier::Basic, Utc::now());
        inactive.is_active = false;
        repo.save(&inactive, Duration::days(1)).await.unwrap();
        assert!(matches!(
            service.resolve_license(key.as_str()).await,
            Err(LicenseError::Inactive)
        ));

        let key = LicenseKey::parse("MC-222222222222").unwrap();
        let mut expired = License::issue("a@b.c", key.clone(), LicenseTier::Basic, Utc::now());
        expired.expires_at = Utc::now() - Duration::minutes(1);
        repo.save(&expired, Duration::days(1)).await.unwrap();
        assert!(matches!(
            service.resolve_license(key.as_str()).await,
            Err(LicenseError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_verify_reports_missing_key() {
        let (service, _) = service();
        assert!(matches!(service.verify("  ").await, Err(LicenseError::Missing)));
    }

    #[tokio::test]
    async fn test_quota_boundary() {
        let (service, _) = service_with_limits(CallLimits {
            basic: 2,
            pro: 5,
            elite: 10,
        });
        let license = service
            .issue_license("a@b.c", LicenseTier::Basic, None)
            .await
            .unwrap();

        assert_eq!(
            service.check_and_consume_quota(&license).await.unwrap(),
            QuotaDecision::Allowed { calls_today: 1, limit: 2 }
        );
        assert_eq!(
            service.check_and_consume_quota(&license).await.unwrap(),
            QuotaDecision::Allowed { calls_today: 2, limit: 2 }
        );
        let third = service.check_and_consume_quota(&license).await.unwrap();
        assert_eq!(third, QuotaDecision::Denied { calls_today: 3, limit: 2 });
        assert!(!third.is_allowed());
    }

    #[tokio::test]
    async fn test_issue_reuses_supplied_key() {
        let (service, repo) = service();
        let key = LicenseKey::parse("MC-ABCDEF012345").unwrap();

        let license = service
            .issue_license("a@b.c", LicenseTier::Elite, Some(key.clone()))
            .await
            .unwrap();

        assert_eq!(license.license_key, key);
        assert!(repo.find(&key).await.unwrap().is_some());
    }
}
