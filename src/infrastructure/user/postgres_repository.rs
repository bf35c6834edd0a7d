//! PostgreSQL user repository implementation
//!
//! Each record is one row: the profile document lives in a JSONB column while
//! `username` and `email` are mirrored into plain columns carrying the unique
//! constraints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::user::{UniqueField, User, UserId, UserProfile, UserRepository};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = "id, data, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC, id ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_unique(
        &self,
        field: UniqueField,
        value: &str,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE {} = $1",
            SELECT_COLUMNS,
            field.as_str()
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by {}: {}", field, e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.email())
        .bind(Json(user.profile()))
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &user, "create"))?;

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, data = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.username())
        .bind(user.email())
        .bind(Json(user.profile()))
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &user, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User not found"));
        }

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database ping failed: {}", e)))?;

        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read id: {}", e)))?;
    let Json(profile): Json<UserProfile> = row
        .try_get("data")
        .map_err(|e| DomainError::storage(format!("Failed to read user document: {}", e)))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Failed to read created_at: {}", e)))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| DomainError::storage(format!("Failed to read updated_at: {}", e)))?;

    Ok(User::from_parts(
        UserId::from(id),
        profile,
        created_at,
        updated_at,
    ))
}

/// Map a failed insert/update, turning unique violations into field conflicts
fn write_error(error: sqlx::Error, user: &User, operation: &str) -> DomainError {
    if let Some(db_error) = error.as_database_error() {
        if db_error.is_unique_violation() {
            return match db_error.constraint().and_then(field_for_constraint) {
                Some(field) => field.conflict(),
                None => DomainError::conflict(
                    "_id",
                    format!("User with ID '{}' already exists", user.id()),
                ),
            };
        }
    }

    DomainError::storage(format!("Failed to {} user: {}", operation, error))
}

fn field_for_constraint(constraint: &str) -> Option<UniqueField> {
    match constraint {
        "users_username_key" => Some(UniqueField::Username),
        "users_email_key" => Some(UniqueField::Email),
        _ => None,
    }
}
