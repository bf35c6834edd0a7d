//! Application state for shared services

use std::sync::Arc;

use serde_json::Value;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::user::UserService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }

    /// State backed by a user service over the given repository
    pub fn with_repository(repository: Arc<dyn UserRepository>) -> Self {
        Self::new(Arc::new(UserService::new(repository)))
    }
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn get(&self, id: &str) -> Result<User, DomainError>;
    async fn create(&self, payload: &Value) -> Result<User, DomainError>;
    async fn update(&self, id: &str, patch: &Value) -> Result<User, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;
    async fn close(&self);
}

#[async_trait::async_trait]
impl<R: UserRepository + ?Sized + 'static> UserServiceTrait for UserService<R> {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn get(&self, id: &str) -> Result<User, DomainError> {
        UserService::get(self, id).await
    }

    async fn create(&self, payload: &Value) -> Result<User, DomainError> {
        UserService::create(self, payload).await
    }

    async fn update(&self, id: &str, patch: &Value) -> Result<User, DomainError> {
        UserService::update(self, id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        UserService::delete(self, id).await
    }

    async fn ping(&self) -> Result<(), DomainError> {
        UserService::ping(self).await
    }

    async fn close(&self) {
        UserService::close(self).await
    }
}
