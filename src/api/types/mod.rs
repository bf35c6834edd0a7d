//! Request and response types for the HTTP API

pub mod envelope;
pub mod error;
pub mod json;

pub use envelope::{DataResponse, ListResponse, MessageResponse};
pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
