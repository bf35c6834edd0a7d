//! User repository trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::contract::UniqueField;
use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations must enforce uniqueness of `username` and `email` on every
/// write and report a violation as [`DomainError::Conflict`] naming the field.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List all users in the store's natural (creation) order
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Get a user by ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find the user currently holding `value` for a unique field
    async fn find_by_unique(
        &self,
        field: UniqueField,
        value: &str,
    ) -> Result<Option<User>, DomainError>;

    /// Insert a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Replace an existing user document
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user, returns false when no record matched
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;

    /// Release store resources. Called once at shutdown.
    async fn close(&self);
}
