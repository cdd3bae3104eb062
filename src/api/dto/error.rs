//! Error response DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ValidationFieldError;

/// Body of every non-2xx API response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable message.
    #[schema(example = "Not logged in")]
    pub error: String,
    /// Stable machine readable code.
    #[schema(example = "UNAUTHENTICATED")]
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationFieldError>>,
}

impl ErrorResponse {
    pub fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<ValidationFieldError>) -> Self {
        self.details = Some(details);
        self
    }
}
