use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::LicenseEnvConfig;
use crate::domain::repositories::LicenseRepository;
use crate::infrastructure::InMemoryLicenseRepository;
use crate::infrastructure::persistence::{Database, SqliteLicenseRepository};

pub struct PersistenceHandle {
    /// Present only when licenses are stored in SQLite
    pub db: Option<Database>,
    pub license_repository: Arc<dyn LicenseRepository>,
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(config: &LicenseEnvConfig) -> Result<PersistenceHandle> {
        let Some(db_url) = config.database_url.as_deref() else {
            info!("DATABASE_URL not set, keeping licenses in memory");
            return Ok(PersistenceHandle {
                db: None,
                license_repository: Arc::new(InMemoryLicenseRepository::new()),
            });
        };

        info!("Initializing Database at {}", db_url);
        let db = Database::new(db_url)
            .await
            .context("Failed to initialize database")?;

        Ok(PersistenceHandle {
            license_repository: Arc::new(SqliteLicenseRepository::new(db.clone())),
            db: Some(db),
        })
    }
}
