//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User identifier, assigned at creation and never changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a client
    pub fn parse(id: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(id.trim()).map(Self)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const NAMES: [&'static str; 3] = ["Male", "Female", "Other"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
    Moderator,
}

impl Role {
    pub const NAMES: [&'static str; 3] = ["User", "Admin", "Moderator"];
}

/// Primary phone - both parts required
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    pub country_code: String,
    pub number: String,
}

/// Alternate phone - each part optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AltPhone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_street: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// The client-controlled part of a user record, always in normalized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_email: Option<String>,
    pub phone: Phone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_phone: Option<AltPhone>,
    pub gender: Gender,
    pub dob: DateTime<Utc>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_email_verified: bool,
    pub address: Address,
    pub alt_address: Address,
}

/// A stored user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    id: UserId,
    #[serde(flatten)]
    profile: UserProfile,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new record with a generated ID
    pub fn new(profile: UserProfile) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::generate(),
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a record loaded from storage
    pub fn from_parts(
        id: UserId,
        profile: UserProfile,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            profile,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Replace the profile with an already validated one
    pub fn replace_profile(&mut self, profile: UserProfile) {
        self.profile = profile;
        self.updated_at = Utc::now();
    }
}
