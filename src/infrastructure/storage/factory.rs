//! Storage factory for runtime storage selection

use std::sync::Arc;

use tracing::info;

use crate::config::StorageSettings;
use crate::domain::user::UserRepository;
use crate::domain::DomainError;
use crate::infrastructure::user::{InMemoryUserRepository, PostgresUserRepository};

use super::migrations::run_migrations;
use super::postgres::{connect_pool, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Build from the `storage` section of the application configuration
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, DomainError> {
        let storage_type = StorageType::from_str(&settings.backend).ok_or_else(|| {
            DomainError::configuration(format!(
                "Unknown storage backend '{}' (expected memory or postgres)",
                settings.backend
            ))
        })?;

        match storage_type {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => {
                let url = settings
                    .database_url
                    .as_deref()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or_else(|| {
                        DomainError::configuration(
                            "storage.database_url is required for the postgres backend",
                        )
                    })?;

                Ok(Self::Postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(settings.max_connections)
                        .with_min_connections(settings.min_connections)
                        .with_connect_timeout(settings.connect_timeout_secs)
                        .with_idle_timeout(settings.idle_timeout_secs),
                ))
            }
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating user repositories
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a user repository based on the configuration
    ///
    /// Postgres pools are connected and migrated before being handed out.
    pub async fn create_user_repository(
        config: &StorageConfig,
    ) -> Result<Arc<dyn UserRepository>, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory user storage");
                Ok(Arc::new(InMemoryUserRepository::new()))
            }
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;
                let applied = run_migrations(&pool).await?;
                info!(applied, "Using PostgreSQL user storage");
                Ok(Arc::new(PostgresUserRepository::new(pool)))
            }
        }
    }
}
