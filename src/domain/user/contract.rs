//! Record contract - create/update validation and uniqueness rules

use std::fmt;

use serde_json::{Map, Value};

use super::entity::{UserId, UserProfile};
use super::repository::UserRepository;
use super::schema::USER_SCHEMA;
use crate::domain::schema::{expand_dotted_paths, merge_patch, FieldErrors, DOCUMENT_PATH};
use crate::domain::DomainError;

/// Fields whose values must be unique across all user records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    Username,
    Email,
}

impl UniqueField {
    pub const ALL: [UniqueField; 2] = [UniqueField::Username, UniqueField::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }

    /// The profile's (normalized) value for this field
    pub fn value_of<'a>(&self, profile: &'a UserProfile) -> &'a str {
        match self {
            Self::Username => &profile.username,
            Self::Email => &profile.email,
        }
    }

    /// Conflict error reported when this field's value is already taken
    pub fn conflict(&self) -> DomainError {
        DomainError::conflict(
            self.as_str(),
            format!("Duplicate field: {} already exists", self.as_str()),
        )
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validate a full creation payload and return the normalized profile
pub fn validate_for_create(payload: &Value) -> Result<UserProfile, DomainError> {
    let document = USER_SCHEMA
        .validate(payload)
        .map_err(DomainError::validation)?;

    into_profile(document)
}

/// Merge a partial payload onto an existing profile, then validate the whole result
///
/// Nested objects merge per sub-field, dotted keys (`"address.city"`) address a
/// single sub-field and `null` clears a field. The merged document must pass
/// the same rules as a creation payload.
pub fn validate_for_update(
    existing: &UserProfile,
    patch: &Value,
) -> Result<UserProfile, DomainError> {
    let Value::Object(patch) = patch else {
        return Err(DomainError::validation(FieldErrors::single(
            DOCUMENT_PATH,
            "Update payload must be a JSON object",
        )));
    };

    let mut merged = serde_json::to_value(existing)
        .map_err(|e| DomainError::internal(format!("Failed to serialize user: {}", e)))?;

    merge_patch(&mut merged, &Value::Object(expand_dotted_paths(patch)));

    validate_for_create(&merged)
}

fn into_profile(document: Map<String, Value>) -> Result<UserProfile, DomainError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| DomainError::internal(format!("Validated user document is malformed: {}", e)))
}

/// Fail with a conflict if another record already holds `value` for `field`
///
/// `exclude_id` lets an update ignore the record's own current value. This is a
/// pre-check only; the repository's unique index stays the authority.
pub async fn check_uniqueness<R>(
    repository: &R,
    field: UniqueField,
    value: &str,
    exclude_id: Option<&UserId>,
) -> Result<(), DomainError>
where
    R: UserRepository + ?Sized,
{
    match repository.find_by_unique(field, value).await? {
        Some(holder) if Some(holder.id()) != exclude_id => Err(field.conflict()),
        _ => Ok(()),
    }
}

/// Run [`check_uniqueness`] for every unique field of a profile
pub async fn check_profile_uniqueness<R>(
    repository: &R,
    profile: &UserProfile,
    exclude_id: Option<&UserId>,
) -> Result<(), DomainError>
where
    R: UserRepository + ?Sized,
{
    for field in UniqueField::ALL {
        check_uniqueness(repository, field, field.value_of(profile), exclude_id).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::entity::fixtures::{valid_payload, valid_payload_for};
    use crate::domain::user::entity::{Gender, Role, User};
    use crate::domain::user::repository::MockUserRepository;
    use serde_json::json;

    fn validation_errors(result: Result<UserProfile, DomainError>) -> FieldErrors {
        match result {
            Err(DomainError::Validation { errors }) => errors,
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_create_normalizes_fields() {
        let mut payload = valid_payload();
        payload["firstName"] = json!("  John  ");
        payload["username"] = json!(" John_Doe1 ");
        payload["email"] = json!("John@Example.COM");
        payload["middleName"] = json!("");
        payload["altPhone"] = json!({ "countryCode": "", "number": "" });

        let profile = validate_for_create(&payload).unwrap();

        assert_eq!(profile.first_name, "John");
        assert_eq!(profile.username, "john_doe1");
        assert_eq!(profile.email, "john@example.com");
        assert_eq!(profile.middle_name, None);
        assert_eq!(profile.alt_phone, None);
        assert_eq!(profile.gender, Gender::Male);
        assert_eq!(profile.role, Role::User);
        assert!(!profile.is_email_verified);
        assert_eq!(profile.address.country, "India");
        assert_eq!(profile.alt_address.country, "India");
        assert_eq!(profile.dob.to_rfc3339(), "1990-05-14T00:00:00+00:00");
    }

    #[test]
    fn test_create_reports_every_violation() {
        let mut payload = valid_payload();
        payload["firstName"] = json!("Jo");
        payload["username"] = json!("john doe");
        payload["phone"] = json!({ "countryCode": "91", "number": "1234567890" });
        payload["gender"] = json!("Unknown");
        payload["address"]
            .as_object_mut()
            .unwrap()
            .remove("city");
        payload["altAddress"]["zipCode"] = json!("12345");

        let errors = validation_errors(validate_for_create(&payload));

        assert_eq!(
            errors.get("firstName"),
            Some("First name must be at least 3 characters long")
        );
        assert_eq!(
            errors.get("username"),
            Some("Username can only contain lowercase letters, numbers, and underscores")
        );
        assert_eq!(errors.get("phone.countryCode"), Some("Invalid country code format"));
        assert_eq!(errors.get("phone.number"), Some("Invalid phone number format"));
        assert_eq!(
            errors.get("gender"),
            Some("Gender must be one of: Male, Female, Other")
        );
        assert_eq!(errors.get("address.city"), Some("City is required"));
        assert_eq!(
            errors.get("altAddress.zipCode"),
            Some("Please enter a valid 6-digit ZIP code")
        );
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn test_create_missing_required_fields() {
        let errors = validation_errors(validate_for_create(&json!({})));

        for path in [
            "firstName",
            "lastName",
            "username",
            "email",
            "phone",
            "gender",
            "dob",
            "address",
            "altAddress",
        ] {
            assert!(errors.contains(path), "missing error for {}", path);
        }
        assert!(!errors.contains("middleName"));
        assert!(!errors.contains("role"));
    }

    #[test]
    fn test_padded_pattern_and_enum_values_are_rejected() {
        let mut payload = valid_payload();
        payload["phone"] = json!({ "countryCode": " +91 ", "number": " 9876543210 " });
        payload["address"]["zipCode"] = json!(" 411001 ");
        payload["gender"] = json!(" Male ");
        payload["role"] = json!("Admin ");

        let errors = validation_errors(validate_for_create(&payload));

        assert_eq!(errors.get("phone.countryCode"), Some("Invalid country code format"));
        assert_eq!(errors.get("phone.number"), Some("Invalid phone number format"));
        assert_eq!(
            errors.get("address.zipCode"),
            Some("Please enter a valid 6-digit ZIP code")
        );
        assert_eq!(
            errors.get("gender"),
            Some("Gender must be one of: Male, Female, Other")
        );
        assert!(errors.contains("role"));
    }

    #[test]
    fn test_create_rejects_non_object() {
        let errors = validation_errors(validate_for_create(&json!("user")));
        assert!(errors.contains(DOCUMENT_PATH));
    }

    #[test]
    fn test_alt_phone_parts_are_individually_optional() {
        let mut payload = valid_payload();
        payload["altPhone"] = json!({ "number": "9123456789" });

        let profile = validate_for_create(&payload).unwrap();
        let alt_phone = profile.alt_phone.unwrap();
        assert_eq!(alt_phone.number.as_deref(), Some("9123456789"));
        assert_eq!(alt_phone.country_code, None);
    }

    #[test]
    fn test_update_single_nested_field_keeps_siblings() {
        let existing = validate_for_create(&valid_payload()).unwrap();

        let updated =
            validate_for_update(&existing, &json!({ "address": { "city": "Mumbai" } })).unwrap();

        assert_eq!(updated.address.city, "Mumbai");
        assert_eq!(updated.address.street, existing.address.street);
        assert_eq!(updated.address.state, existing.address.state);
        assert_eq!(updated.address.zip_code, existing.address.zip_code);
        assert_eq!(updated.alt_address, existing.alt_address);
        assert_eq!(updated.first_name, existing.first_name);
    }

    #[test]
    fn test_update_with_dotted_path() {
        let existing = validate_for_create(&valid_payload()).unwrap();

        let updated = validate_for_update(&existing, &json!({ "altAddress.city": "Delhi" })).unwrap();

        assert_eq!(updated.alt_address.city, "Delhi");
        assert_eq!(updated.alt_address.zip_code, "700016");
    }

    #[test]
    fn test_update_clearing_required_field_fails() {
        let existing = validate_for_create(&valid_payload()).unwrap();

        let errors = validation_errors(validate_for_update(
            &existing,
            &json!({ "address": { "zipCode": "" } }),
        ));
        assert_eq!(errors.get("address.zipCode"), Some("ZIP code is required"));

        let errors = validation_errors(validate_for_update(&existing, &json!({ "email": null })));
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn test_update_normalizes_and_clears_optional() {
        let mut payload = valid_payload();
        payload["middleName"] = json!("Lee");
        let existing = validate_for_create(&payload).unwrap();

        let updated = validate_for_update(
            &existing,
            &json!({ "middleName": null, "username": "NEW_Name", "role": "Admin" }),
        )
        .unwrap();

        assert_eq!(updated.middle_name, None);
        assert_eq!(updated.username, "new_name");
        assert_eq!(updated.role, Role::Admin);
    }

    #[test]
    fn test_empty_update_revalidates_whole_document() {
        let existing = validate_for_create(&valid_payload()).unwrap();
        assert_eq!(validate_for_update(&existing, &json!({})).unwrap(), existing);

        // A record stored before a stricter rule existed fails even an empty update
        let mut legacy = existing;
        legacy.address.zip_code = "1234".to_string();
        let errors = validation_errors(validate_for_update(&legacy, &json!({})));
        assert!(errors.contains("address.zipCode"));
    }

    #[test]
    fn test_update_ignores_system_fields() {
        let existing = validate_for_create(&valid_payload()).unwrap();

        let updated = validate_for_update(
            &existing,
            &json!({ "_id": "something-else", "createdAt": "2000-01-01" }),
        )
        .unwrap();

        assert_eq!(updated, existing);
    }

    #[tokio::test]
    async fn test_check_uniqueness_conflict() {
        let holder = User::new(validate_for_create(&valid_payload()).unwrap());
        let holder_clone = holder.clone();

        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_unique()
            .returning(move |_, _| Ok(Some(holder_clone.clone())));

        let result =
            check_uniqueness(&repository, UniqueField::Username, "john_doe1", None).await;
        match result {
            Err(DomainError::Conflict { field, message }) => {
                assert_eq!(field, "username");
                assert_eq!(message, "Duplicate field: username already exists");
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        // The record's own value is not a conflict
        let result =
            check_uniqueness(&repository, UniqueField::Username, "john_doe1", Some(holder.id()))
                .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_check_profile_uniqueness_checks_email() {
        let holder = User::new(
            validate_for_create(&valid_payload_for("someone_else", "john@example.com")).unwrap(),
        );

        let mut repository = MockUserRepository::new();
        repository
            .expect_find_by_unique()
            .returning(move |field, _| match field {
                UniqueField::Username => Ok(None),
                UniqueField::Email => Ok(Some(holder.clone())),
            });

        let profile = validate_for_create(&valid_payload()).unwrap();
        let result = check_profile_uniqueness(&repository, &profile, None).await;

        assert!(matches!(
            result,
            Err(DomainError::Conflict { ref field, .. }) if field == "email"
        ));
    }
}
