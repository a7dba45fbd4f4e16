//! License domain: keys, tiers and the stored license record.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::LicenseError;

const KEY_PREFIX: &str = "MC-";
const KEY_HEX_LEN: usize = 12;

/// Licenses stay in storage for two years
pub const LICENSE_TTL_DAYS: i64 = 730;

/// A validated `MC-XXXXXXXXXXXX` license key (12 uppercase hex digits)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Generate a fresh key from 6 random bytes
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bytes: [u8; KEY_HEX_LEN / 2] = rng.random();
        Self(format!("{}{}", KEY_PREFIX, hex::encode_upper(bytes)))
    }

    pub fn parse(raw: &str) -> Result<Self, LicenseError> {
        if Self::is_valid_format(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(LicenseError::InvalidFormat)
        }
    }

    pub fn is_valid_format(raw: &str) -> bool {
        match raw.strip_prefix(KEY_PREFIX) {
            Some(digits) => {
                digits.len() == KEY_HEX_LEN
                    && digits
                        .chars()
                        .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LicenseKey {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LicenseKey {
    type Error = LicenseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LicenseKey> for String {
    fn from(key: LicenseKey) -> Self {
        key.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    Basic,
    Pro,
    Elite,
}

impl LicenseTier {
    /// Tier bought with a given order total in USD
    pub fn from_price(price_usd: Decimal) -> Self {
        if price_usd >= Decimal::from(497) {
            Self::Elite
        } else if price_usd >= Decimal::from(197) {
            Self::Pro
        } else {
            Self::Basic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Elite => "elite",
        }
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseTier {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            "elite" => Ok(Self::Elite),
            other => Err(LicenseError::UnknownTier(other.to_string())),
        }
    }
}

/// Daily API call allowance per tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallLimits {
    pub basic: u32,
    pub pro: u32,
    pub elite: u32,
}

impl Default for CallLimits {
    fn default() -> Self {
        Self {
            basic: 100,
            pro: 1_000,
            elite: 10_000,
        }
    }
}

impl CallLimits {
    pub fn for_tier(&self, tier: LicenseTier) -> u32 {
        match tier {
            LicenseTier::Basic => self.basic,
            LicenseTier::Pro => self.pro,
            LicenseTier::Elite => self.elite,
        }
    }
}

/// Stored license record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub email: String,
    pub license_key: LicenseKey,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub plan: LicenseTier,
    pub api_calls_today: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_api_call: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl License {
    /// New active license valid for two years from `now`
    pub fn issue(
        email: impl Into<String>,
        license_key: LicenseKey,
        plan: LicenseTier,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            license_key,
            created_at: now,
            expires_at: add_years(now, 2),
            plan,
            api_calls_today: 0,
            last_api_call: None,
            is_active: true,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

fn add_years(at: DateTime<Utc>, years: i32) -> DateTime<Utc> {
    use chrono::Datelike;
    // Feb 29 has no counterpart in a non-leap target year
    at.with_year(at.year() + years)
        .unwrap_or_else(|| at + Duration::days(365 * years as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rust_decimal_macros::dec;

    #[test]
    fn test_generated_key_is_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let key = LicenseKey::generate_with(&mut rng);
            assert!(LicenseKey::is_valid_format(key.as_str()), "{}", key);
            assert_eq!(key.as_str().len(), 15);
        }
    }

    #[test]
    fn test_key_format_rejects_lowercase_and_wrong_length() {
        assert!(LicenseKey::parse("MC-0123456789AB").is_ok());
        assert!(LicenseKey::parse("MC-0123456789ab").is_err());
        assert!(LicenseKey::parse("MC-0123456789A").is_err());
        assert!(LicenseKey::parse("XX-0123456789AB").is_err());
        assert!(LicenseKey::parse("MC-0123456789ABC").is_err());
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(LicenseTier::from_price(dec!(196.99)), LicenseTier::Basic);
        assert_eq!(LicenseTier::from_price(dec!(197)), LicenseTier::Pro);
        assert_eq!(LicenseTier::from_price(dec!(496.99)), LicenseTier::Pro);
        assert_eq!(LicenseTier::from_price(dec!(497)), LicenseTier::Elite);
    }

    #[test]
    fn test_issue_expires_two_years_later() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let key = LicenseKey::parse("MC-AAAAAAAAAAAA").unwrap();
        let license = License::issue("a@b.c", key, LicenseTier::Pro, now);

        assert_eq!(
            license.expires_at,
            Utc.with_ymd_and_hms(2027, 3, 1, 12, 0, 0).unwrap()
        );
        assert!(!license.is_expired(now));
        assert!(license.is_expired(Utc.with_ymd_and_hms(2027, 3, 2, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_license_json_uses_camel_case() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let key = LicenseKey::parse("MC-AAAAAAAAAAAA").unwrap();
        let license = License::issue("a@b.c", key, LicenseTier::Elite, now);

        let json = serde_json::to_value(&license).unwrap();
        assert_eq!(json["licenseKey"], "MC-AAAAAAAAAAAA");
        assert_eq!(json["plan"], "elite");
        assert_eq!(json["isActive"], true);

        let decoded: License = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, license);
    }
}
