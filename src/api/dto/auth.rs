//! Login, logout and current-user DTOs.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for `POST /api/auth/login`.
///
/// Absent fields read as empty strings. A body that breaks a length rule is
/// answered exactly like a wrong password.
#[derive(Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 256, message = "Username must be between 1 and 256 characters"))]
    #[schema(min_length = 1, max_length = 256, example = "admin")]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 1024, message = "Password must be between 1 and 1024 characters"))]
    #[schema(format = "password", min_length = 1, max_length = 1024)]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Plain acknowledgement returned by login and logout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Login successful")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub username: String,
}
