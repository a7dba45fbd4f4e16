use crate::domain::license::{License, LicenseKey, LicenseTier};
use crate::domain::repositories::LicenseRepository;
use crate::infrastructure::persistence::database::Database;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::str::FromStr;
use tracing::info;

type LicenseRow = (
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    i64,
    Option<DateTime<Utc>>,
    bool,
);

pub struct SqliteLicenseRepository {
    database: Database,
}

impl SqliteLicenseRepository {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn map_row(row: LicenseRow) -> Result<License> {
        let (key, email, plan, created_at, expires_at, calls, last_api_call, is_active) = row;

        Ok(License {
            email,
            license_key: LicenseKey::parse(&key)
                .with_context(|| format!("Stored license key {:?} is malformed", key))?,
            created_at,
            expires_at,
            plan: LicenseTier::from_str(&plan)?,
            api_calls_today: calls.max(0) as u32,
            last_api_call,
            is_active,
        })
    }
}

#[async_trait]
impl LicenseRepository for SqliteLicenseRepository {
    /// Save the license (upsert) with a storage deadline of now + ttl
    async fn save(&self, license: &License, ttl: Duration) -> Result<()> {
        let stored_until = (Utc::now() + ttl).timestamp();

        sqlx::query(
            r#"
            INSERT INTO licenses (
                license_key,
                email,
                plan,
                created_at,
                expires_at,
                api_calls_today,
                last_api_call,
                is_active,
                stored_until
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT(license_key) DO UPDATE SET
                email = excluded.email,
                plan = excluded.plan,
                created_at = excluded.created_at,
                expires_at = excluded.expires_at,
                api_calls_today = excluded.api_calls_today,
                last_api_call = excluded.last_api_call,
                is_active = excluded.is_active,
                stored_until = excluded.stored_until
            "#,
        )
        .bind(license.license_key.as_str())
        .bind(&license.email)
        .bind(license.plan.as_str())
        .bind(license.created_at)
        .bind(license.expires_at)
        .bind(license.api_calls_today as i64)
        .bind(license.last_api_call)
        .bind(license.is_active)
        .bind(stored_until)
        .execute(&self.database.pool)
        .await
        .context("Failed to save license")?;

        info!("Persisted license {} ({})", license.license_key, license.plan);
        Ok(())
    }

    async fn find(&self, key: &LicenseKey) -> Result<Option<License>> {
        let row = sqlx::query_as::<_, LicenseRow>(
            r#"
            SELECT
                license_key,
                email,
                plan,
                created_at,
                expires_at,
                api_calls_today,
                last_api_call,
                is_active
            FROM licenses
            WHERE license_key = $1 AND stored_until > $2
            "#,
        )
        .bind(key.as_str())
        .bind(Utc::now().timestamp())
        .fetch_optional(&self.database.pool)
        .await
        .context("Failed to load license")?;

        row.map(Self::map_row).transpose()
    }

    async fn increment_calls(&self, key: &LicenseKey, day: NaiveDate) -> Result<u32> {
        let mut tx = self.database.pool.begin().await?;

        sqlx::query("DELETE FROM api_calls WHERE license_key = $1 AND day < $2")
            .bind(key.as_str())
            .bind(day)
            .execute(&mut *tx)
            .await
            .context("Failed to prune old API call counters")?;

        let (calls,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO api_calls (license_key, day, calls)
            VALUES ($1, $2, 1)
            ON CONFLICT(license_key, day) DO UPDATE SET calls = calls + 1
            RETURNING calls
            "#,
        )
        .bind(key.as_str())
        .bind(day)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to increment API call counter")?;

        sqlx::query(
            "UPDATE licenses SET api_calls_today = $1, last_api_call = $2 WHERE license_key = $3",
        )
        .bind(calls)
        .bind(Utc::now())
        .bind(key.as_str())
        .execute(&mut *tx)
        .await
        .context("Failed to record last API call")?;

        tx.commit().await?;
        Ok(calls.max(0) as u32)
    }

    async fn calls_on(&self, key: &LicenseKey, day: NaiveDate) -> Result<u32> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT calls FROM api_calls WHERE license_key = $1 AND day = $2")
                .bind(key.as_str())
                .bind(day)
                .fetch_optional(&self.database.pool)
                .await
                .context("Failed to read API call counter")?;

        Ok(row.map(|(calls,)| calls.max(0) as u32).unwrap_or(0))
    }
}
