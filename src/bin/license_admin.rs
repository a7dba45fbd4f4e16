//! License administration against the SQLite license store.
//!
//! # Usage
//! ```sh
//! cargo run --bin license-admin -- issue --email buyer@example.com --plan pro
//! cargo run --bin license-admin -- issue --email buyer@example.com --price 497
//! cargo run --bin license-admin -- show MC-0123456789AB
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use marketcube::application::licensing::LicenseService;
use marketcube::config::LicenseEnvConfig;
use marketcube::domain::license::{LicenseKey, LicenseTier};
use marketcube::domain::repositories::LicenseRepository;
use marketcube::infrastructure::persistence::{Database, SqliteLicenseRepository};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Manage MarketCube licenses", long_about = None)]
struct Cli {
    /// SQLite URL (falls back to DATABASE_URL)
    #[arg(long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print fresh license keys without storing them
    Generate {
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Create and store a license
    Issue {
        #[arg(short, long)]
        email: String,
        /// basic, pro or elite
        #[arg(short, long, conflicts_with = "price")]
        plan: Option<String>,
        /// Order total in USD; the tier is derived from it
        #[arg(long)]
        price: Option<String>,
        /// Reuse an existing key instead of generating one
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Show a stored license and today's usage
    Show { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let cli = Cli::parse();

    if let Commands::Generate { count } = cli.command {
        for _ in 0..count {
            println!("{}", LicenseKey::generate());
        }
        return Ok(());
    }

    let license_config = LicenseEnvConfig::from_env()?;
    let db_url = cli
        .database
        .or(license_config.database_url.clone())
        .context("No database given: pass --database or set DATABASE_URL")?;

    let db = Database::new(&db_url).await?;
    let repository = Arc::new(SqliteLicenseRepository::new(db.clone()));
    let service = LicenseService::new(repository.clone(), license_config.call_limits);

    match cli.command {
        Commands::Generate { .. } => {}
        Commands::Issue {
            email,
            plan,
            price,
            key,
        } => {
            let tier = match (plan, price) {
                (Some(plan), _) => LicenseTier::from_str(&plan)?,
                (None, Some(price)) => LicenseTier::from_price(
                    Decimal::from_str(price.trim())
                        .with_context(|| format!("Invalid price: {}", price))?,
                ),
                (None, None) => LicenseTier::Basic,
            };
            let key = key.map(|k| LicenseKey::parse(&k)).transpose()?;

            let license = service.issue_license(&email, tier, key).await?;
            println!("{}", serde_json::to_string_pretty(&license)?);
        }
        Commands::Show { key } => {
            let key = LicenseKey::parse(key.trim())?;
            let license = repository
                .find(&key)
                .await?
                .with_context(|| format!("License {} not found", key))?;
            let calls_today = repository.calls_on(&key, Utc::now().date_naive()).await?;
            let limit = service.limits().for_tier(license.plan);

            println!("{}", serde_json::to_string_pretty(&license)?);
            info!("Usage today: {}/{} calls", calls_today, limit);
        }
    }

    db.pool.close().await;
    Ok(())
}
