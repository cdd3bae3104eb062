//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `auth` - login, logout and current-user bodies
//! - `process` - process listings and run history
//! - `error` - the common error body

mod auth;
mod error;
mod process;

pub use auth::{LoginRequest, MeResponse, MessageResponse};
pub use error::ErrorResponse;
pub use process::{ProcessQuery, ProcessResponse, RunResponse};
