//! User infrastructure module
//!
//! Repository implementations for the in-memory and PostgreSQL backends, and
//! the user service that enforces the record contract on top of them.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::UserService;
