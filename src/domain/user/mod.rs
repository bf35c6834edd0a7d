//! User domain - record shape, validation contract and repository

mod contract;
mod entity;
mod repository;
mod schema;

pub use contract::{
    check_profile_uniqueness, check_uniqueness, validate_for_create, validate_for_update,
    UniqueField,
};
pub use entity::{Address, AltPhone, Gender, Phone, Role, User, UserId, UserProfile};
pub use repository::UserRepository;
pub use schema::{DEFAULT_COUNTRY, USER_SCHEMA};

#[cfg(test)]
pub use entity::fixtures;
#[cfg(test)]
pub use repository::MockUserRepository;
