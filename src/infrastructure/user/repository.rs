//! In-memory user repository implementation

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::{UniqueField, User, UserId, UserRepository};
use crate::domain::DomainError;

/// Records plus the unique indexes, guarded together so every write is atomic
#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    /// Insertion order, which is the natural listing order
    order: Vec<UserId>,
    username_index: HashMap<String, UserId>,
    email_index: HashMap<String, UserId>,
}

impl UserTable {
    fn index(&self, field: UniqueField) -> &HashMap<String, UserId> {
        match field {
            UniqueField::Username => &self.username_index,
            UniqueField::Email => &self.email_index,
        }
    }

    /// First unique field whose value is held by a record other than `user`
    fn conflicting_field(&self, user: &User) -> Option<UniqueField> {
        UniqueField::ALL.into_iter().find(|field| {
            self.index(*field)
                .get(field.value_of(user.profile()))
                .is_some_and(|holder| holder != user.id())
        })
    }

    fn unindex(&mut self, user: &User) {
        self.username_index.remove(user.username());
        self.email_index.remove(user.email());
    }

    fn reindex(&mut self, user: &User) {
        self.username_index
            .insert(user.username().to_string(), *user.id());
        self.email_index.insert(user.email().to_string(), *user.id());
    }
}

/// In-memory implementation of UserRepository
///
/// Useful for development and tests. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .order
            .iter()
            .filter_map(|id| table.users.get(id).cloned())
            .collect())
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table.users.get(id).cloned())
    }

    async fn find_by_unique(
        &self,
        field: UniqueField,
        value: &str,
    ) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .index(field)
            .get(value)
            .and_then(|id| table.users.get(id).cloned()))
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        if table.users.contains_key(user.id()) {
            return Err(DomainError::conflict(
                "_id",
                format!("User with ID '{}' already exists", user.id()),
            ));
        }

        if let Some(field) = table.conflicting_field(&user) {
            return Err(field.conflict());
        }

        table.reindex(&user);
        table.order.push(*user.id());
        table.users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        let Some(previous) = table.users.get(user.id()).cloned() else {
            return Err(DomainError::not_found("User not found"));
        };

        if let Some(field) = table.conflicting_field(&user) {
            return Err(field.conflict());
        }

        table.unindex(&previous);
        table.reindex(&user);
        table.users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;

        let Some(user) = table.users.remove(id) else {
            return Ok(false);
        };

        table.unindex(&user);
        table.order.retain(|existing| existing != id);

        Ok(true)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn close(&self) {}
}
