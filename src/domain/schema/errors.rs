//! Field-level validation failures keyed by field path

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapping of dotted field path (e.g. `address.city`) to the first rule it violated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding a single violation
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(path, message);
        errors
    }

    /// Record a violation. The first message recorded for a path wins.
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(path, message)| format!("{}: {}", path, message))
            .collect();

        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is required");
        errors.insert("email", "Please provide a valid email address");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let errors = FieldErrors::single("address.zipCode", "ZIP code is required");
        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json, serde_json::json!({ "address.zipCode": "ZIP code is required" }));
    }

    #[test]
    fn test_paths_are_sorted() {
        let mut errors = FieldErrors::new();
        errors.insert("username", "Username is required");
        errors.insert("address.city", "City is required");

        assert_eq!(
            errors.to_string(),
            "address.city: City is required; username: Username is required"
        );
    }
}
