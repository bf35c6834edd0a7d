//! Domain layer - Core business logic and entities

pub mod error;
pub mod schema;
pub mod user;

pub use error::DomainError;
pub use schema::FieldErrors;
