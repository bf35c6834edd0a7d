//! Field rules for the user document

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use super::entity::{Gender, Role};
use crate::domain::schema::{FieldRule, Schema};

pub const DEFAULT_COUNTRY: &str = "India";

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").unwrap());

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

static COUNTRY_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+\d{1,4}$").unwrap());

static PHONE_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").unwrap());

static ZIP_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").unwrap());

/// The complete rule table for a user record
pub static USER_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldRule::text("firstName", "First name")
            .required("First name is required")
            .trim()
            .min_length(3, "First name must be at least 3 characters long")
            .max_length(20, "First name must not exceed 20 characters"),
        FieldRule::text("middleName", "Middle name")
            .trim()
            .max_length(20, "Middle name must not exceed 20 characters"),
        FieldRule::text("lastName", "Last name")
            .required("Last name is required")
            .trim()
            .min_length(3, "Last name must be at least 3 characters long")
            .max_length(20, "Last name must not exceed 20 characters"),
        FieldRule::text("username", "Username")
            .required("Username is required")
            .trim()
            .lowercase()
            .min_length(3, "Username must be at least 3 characters long")
            .max_length(30, "Username must not exceed 30 characters")
            .pattern(
                &USERNAME_PATTERN,
                "Username can only contain lowercase letters, numbers, and underscores",
            ),
        FieldRule::text("email", "Email")
            .required("Email is required")
            .trim()
            .lowercase()
            .pattern(&EMAIL_PATTERN, "Please provide a valid email address"),
        FieldRule::text("altEmail", "Alternate email")
            .trim()
            .lowercase()
            .pattern(&EMAIL_PATTERN, "Please provide a valid alternate email address"),
        FieldRule::group("phone", "Phone", phone_fields(true)).required("Phone is required"),
        FieldRule::group("altPhone", "Alternate phone", phone_fields(false)),
        FieldRule::text("gender", "Gender")
            .required("Gender is required")
            .one_of(&Gender::NAMES),
        FieldRule::date("dob", "Date of birth").required("Date of birth is required"),
        FieldRule::text("role", "Role")
            .one_of(&Role::NAMES)
            .default_value(json!("User")),
        FieldRule::boolean("isEmailVerified", "Email verified").default_value(json!(false)),
        FieldRule::group("address", "Permanent address", address_fields())
            .required("Permanent address is required"),
        FieldRule::group("altAddress", "Temporary address", address_fields())
            .required("Temporary address is required"),
    ])
});

fn phone_fields(required: bool) -> Vec<FieldRule> {
    let country_code = FieldRule::text("countryCode", "Country code")
        .pattern(&COUNTRY_CODE_PATTERN, "Invalid country code format");
    let number = FieldRule::text("number", "Phone number")
        .pattern(&PHONE_NUMBER_PATTERN, "Invalid phone number format");

    if required {
        vec![
            country_code.required("Country code is required"),
            number.required("Phone number is required"),
        ]
    } else {
        vec![country_code, number]
    }
}

fn address_fields() -> Vec<FieldRule> {
    vec![
        FieldRule::text("street", "Street")
            .required("Street is required")
            .trim()
            .max_length(100, "Street must not exceed 100 characters"),
        FieldRule::text("altStreet", "Alternate street")
            .trim()
            .max_length(100, "Alternate street must not exceed 100 characters"),
        FieldRule::text("city", "City")
            .required("City is required")
            .trim()
            .max_length(50, "City must not exceed 50 characters"),
        FieldRule::text("state", "State")
            .required("State is required")
            .trim()
            .max_length(50, "State must not exceed 50 characters"),
        FieldRule::text("zipCode", "ZIP code")
            .required("ZIP code is required")
            .pattern(&ZIP_CODE_PATTERN, "Please enter a valid 6-digit ZIP code"),
        FieldRule::text("country", "Country")
            .trim()
            .default_value(json!(DEFAULT_COUNTRY)),
    ]
}
