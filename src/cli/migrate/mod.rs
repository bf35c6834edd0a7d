//! Migrate command - applies or reverts the PostgreSQL schema

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{
    connect_pool, revert_migrations, run_migrations, PostgresMigrator, StorageConfig,
};

/// Arguments for the migrate command
#[derive(Args, Debug, Clone, Default)]
pub struct MigrateArgs {
    /// Revert every applied migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,

    /// PostgreSQL URL (overrides storage.database_url)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Run migrations against the configured PostgreSQL database
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    config.storage.backend = "postgres".to_string();
    if let Some(url) = args.database_url {
        config.storage.database_url = Some(url);
    }
    logging::init_logging(&config.logging);

    let StorageConfig::Postgres(pg_config) = StorageConfig::from_settings(&config.storage)? else {
        anyhow::bail!("Migrations require the postgres storage backend");
    };

    let pool = connect_pool(&pg_config).await?;

    if args.revert {
        let reverted = revert_migrations(&pool).await?;
        info!(reverted, "Reverted migrations");
    } else {
        let applied = run_migrations(&pool).await?;
        info!(applied, "Applied migrations");
    }

    let version = PostgresMigrator::new(pool.clone()).current_version().await?;
    info!("Schema version: {}", version.map_or("none".to_string(), |v| v.to_string()));

    pool.close().await;

    Ok(())
}
