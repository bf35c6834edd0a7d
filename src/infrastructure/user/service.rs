//! User service - the access layer over a user repository

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::domain::user::{
    check_profile_uniqueness, validate_for_create, validate_for_update, User, UserId,
    UserRepository,
};
use crate::domain::DomainError;

/// User service for listing, reading and writing user records
#[derive(Debug)]
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository + ?Sized> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// List all users in creation order
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<User, DomainError> {
        let user_id = parse_id(id)?;

        self.repository
            .get(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    /// Validate a creation payload and store the new user
    pub async fn create(&self, payload: &Value) -> Result<User, DomainError> {
        let profile = validate_for_create(payload)?;

        check_profile_uniqueness(self.repository.as_ref(), &profile, None).await?;

        let user = User::new(profile);
        debug!(user_id = %user.id(), username = %user.username(), "Creating user");

        self.repository.create(user).await
    }

    /// Merge a partial payload onto a stored user and save the result
    ///
    /// Nothing is written unless the merged record passes validation and
    /// keeps its unique fields unique. Concurrent updates to the same user are
    /// last-writer-wins: the whole document is replaced without a version check.
    pub async fn update(&self, id: &str, patch: &Value) -> Result<User, DomainError> {
        let user_id = parse_id(id)?;

        let mut user = self
            .repository
            .get(&user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))?;

        let profile = validate_for_update(user.profile(), patch)?;

        check_profile_uniqueness(self.repository.as_ref(), &profile, Some(&user_id)).await?;

        user.replace_profile(profile);
        debug!(user_id = %user_id, "Updating user");

        self.repository.update(user).await
    }

    /// Delete a user
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let user_id = parse_id(id)?;

        if self.repository.delete(&user_id).await? {
            debug!(user_id = %user_id, "Deleted user");
            Ok(())
        } else {
            Err(DomainError::not_found("User not found"))
        }
    }

    /// Check that the underlying store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.repository.ping().await
    }

    /// Release the underlying store
    pub async fn close(&self) {
        self.repository.close().await;
    }
}

fn parse_id(id: &str) -> Result<UserId, DomainError> {
    UserId::parse(id).map_err(|e| DomainError::invalid_id(format!("Invalid user ID '{}': {}", id, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::fixtures::{valid_payload, valid_payload_for};
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::user::repository::InMemoryUserRepository;
    use serde_json::json;

    fn create_service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let user = service.create(&valid_payload()).await.unwrap();
        assert_eq!(user.username(), "john_doe1");
        assert_eq!(user.profile().address.country, "India");
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_reports_missing_nested_field() {
        let service = create_service();
        let mut payload = valid_payload();
        payload["address"]
            .as_object_mut()
            .unwrap()
            .remove("city");

        let result = service.create(&payload).await;
        match result {
            Err(DomainError::Validation { errors }) => {
                assert!(errors.contains("address.city"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_username_ignores_case() {
        let service = create_service();
        service
            .create(&valid_payload_for("john_doe1", "first@example.com"))
            .await
            .unwrap();

        let result = service
            .create(&valid_payload_for("John_Doe1", "second@example.com"))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Conflict { ref field, .. }) if field == "username"
        ));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_ignores_case() {
        let service = create_service();
        service
            .create(&valid_payload_for("first", "john@example.com"))
            .await
            .unwrap();

        let result = service
            .create(&valid_payload_for("second", "John@Example.com"))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Conflict { ref field, .. }) if field == "email"
        ));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let service = create_service();

        let created = service.create(&valid_payload()).await.unwrap();
        let fetched = service.get(&created.id().to_string()).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(
            fetched.profile(),
            &validate_for_create(&valid_payload()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let service = create_service();

        let result = service.get(&UserId::generate().to_string()).await;
        assert!(matches!(
            result,
            Err(DomainError::NotFound { ref message }) if message == "User not found"
        ));
    }

    #[tokio::test]
    async fn test_get_malformed_id() {
        let service = create_service();

        let result = service.get("not-a-valid-id").await;
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[tokio::test]
    async fn test_update_single_nested_field() {
        let service = create_service();
        let created = service.create(&valid_payload()).await.unwrap();

        let updated = service
            .update(
                &created.id().to_string(),
                &json!({ "address": { "city": "Mumbai" } }),
            )
            .await
            .unwrap();

        let address = &updated.profile().address;
        assert_eq!(address.city, "Mumbai");
        assert_eq!(address.street, "12 MG Road");
        assert_eq!(address.state, "Maharashtra");
        assert_eq!(address.zip_code, "411001");
        assert_eq!(updated.created_at(), created.created_at());
    }

    #[tokio::test]
    async fn test_update_dotted_path() {
        let service = create_service();
        let created = service.create(&valid_payload()).await.unwrap();

        let updated = service
            .update(&created.id().to_string(), &json!({ "address.city": "Nagpur" }))
            .await
            .unwrap();

        assert_eq!(updated.profile().address.city, "Nagpur");
        assert_eq!(updated.profile().address.zip_code, "411001");
    }

    #[tokio::test]
    async fn test_failed_update_leaves_record_unchanged() {
        let service = create_service();
        let created = service.create(&valid_payload()).await.unwrap();
        let id = created.id().to_string();

        let result = service
            .update(&id, &json!({ "address": { "zipCode": "" } }))
            .await;
        match result {
            Err(DomainError::Validation { errors }) => {
                assert!(errors.contains("address.zipCode"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }

        let stored = service.get(&id).await.unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let service = create_service();
        service
            .create(&valid_payload_for("first", "first@example.com"))
            .await
            .unwrap();
        let second = service
            .create(&valid_payload_for("second", "second@example.com"))
            .await
            .unwrap();

        let result = service
            .update(
                &second.id().to_string(),
                &json!({ "email": "FIRST@example.com" }),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Conflict { ref field, .. }) if field == "email"
        ));
    }

    #[tokio::test]
    async fn test_update_keeping_own_username() {
        let service = create_service();
        let created = service.create(&valid_payload()).await.unwrap();

        let updated = service
            .update(
                &created.id().to_string(),
                &json!({ "username": "john_doe1", "firstName": "Johnny" }),
            )
            .await
            .unwrap();

        assert_eq!(updated.profile().first_name, "Johnny");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let service = create_service();

        let result = service
            .update(&UserId::generate().to_string(), &json!({ "firstName": "X" }))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::NotFound { ref message }) if message == "User not found"
        ));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let service = create_service();
        let created = service.create(&valid_payload()).await.unwrap();
        let id = created.id().to_string();

        service.delete(&id).await.unwrap();

        let result = service.delete(&id).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_returns_creation_order() {
        let service = create_service();
        for name in ["zed", "amy"] {
            service
                .create(&valid_payload_for(name, &format!("{}@example.com", name)))
                .await
                .unwrap();
        }

        let users = service.list().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.username()).collect();
        assert_eq!(names, vec!["zed", "amy"]);
    }

    #[tokio::test]
    async fn test_list_propagates_storage_failure() {
        let mut repository = MockUserRepository::new();
        repository
            .expect_list()
            .returning(|| Err(DomainError::storage("connection refused")));

        let service = UserService::new(Arc::new(repository));

        let result = service.list().await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_create_maps_write_time_conflict() {
        // Pre-check passes but the store rejects the write
        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_unique()
            .returning(|_, _| Ok(None));
        repository
            .expect_create()
            .returning(|_| Err(crate::domain::user::UniqueField::Email.conflict()));

        let service = UserService::new(Arc::new(repository));

        let result = service.create(&valid_payload()).await;
        assert!(matches!(
            result,
            Err(DomainError::Conflict { ref field, .. }) if field == "email"
        ));
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let repository: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repository);

        service.create(&valid_payload()).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);
        assert!(service.ping().await.is_ok());
    }
}
