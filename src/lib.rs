//! User Records API
//!
//! A REST service for user records with:
//! - Schema-driven validation of create and partial-update payloads
//! - Unique usernames and emails, enforced by the store
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use infrastructure::storage::{StorageConfig, StorageFactory};
use tracing::info;

/// Build the application state from configuration
///
/// Connects (and migrates) the configured store and wires the user service
/// on top of it.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = StorageConfig::from_settings(&config.storage)?;
    info!("Storage backend: {:?}", storage_config.storage_type());

    let repository = StorageFactory::create_user_repository(&storage_config).await?;

    Ok(AppState::with_repository(repository))
}
