//! Error handler for converting AppError to HTTP responses.
//!
//! Every failure an API client can observe carries the same JSON body,
//! [`ErrorResponse`]. Handler errors get it through [`IntoResponse`] for
//! [`AppError`]; plain-text errors produced by the framework itself (unknown
//! API route, wrong method, oversized body) are rewritten by
//! [`api_error_normaliser`].

use axum::{
    Json,
    body::to_bytes,
    extract::{Request, rejection::JsonRejection},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::api::middleware::auth_gate::is_api_path;
use crate::error::{AppError, INVALID_CREDENTIALS_MESSAGE};

/// Largest framework error body read back when normalising.
const MAX_ERROR_BODY: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - Unauthenticated, InvalidCredentials → 401
    /// - BadRequest, ValidationErrors → 400
    /// - NotFound → 404
    /// - Store, Configuration, Internal → 500
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let body = match self {
            AppError::Unauthenticated { message } => ErrorResponse::new(code, message),
            AppError::InvalidCredentials => ErrorResponse::new(code, INVALID_CREDENTIALS_MESSAGE),
            AppError::Store { operation, message } => {
                tracing::error!(%operation, error = %message, "Store operation failed");
                ErrorResponse::new(code, message)
            }
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::new(code, format!("{entity} with {field}={value} not found")),
            AppError::BadRequest { message } => ErrorResponse::new(code, message),
            AppError::ValidationErrors { errors } => {
                ErrorResponse::new(code, "Validation failed").with_details(errors)
            }
            AppError::Configuration { message } => {
                tracing::error!(error = %message, "Configuration error while serving request");
                ErrorResponse::new(code, message)
            }
            AppError::Internal { source } => {
                tracing::error!(error = ?source, "Internal error while serving request");
                ErrorResponse::new(code, "An internal error occurred")
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::Unauthenticated { .. } | AppError::InvalidCredentials => {
            StatusCode::UNAUTHORIZED
        }
        AppError::BadRequest { .. } | AppError::ValidationErrors { .. } => {
            StatusCode::BAD_REQUEST
        }
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Store { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::Unauthenticated { .. } => "UNAUTHENTICATED",
        AppError::InvalidCredentials => "INVALID_CREDENTIALS",
        AppError::Store { .. } => "STORE_ERROR",
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Rewrites non-JSON error responses on `/api` paths into [`ErrorResponse`].
///
/// The plain-text body becomes the `error` message; an empty body
/// falls back to the status reason phrase. Headers such as `Allow` survive.
pub async fn api_error_normaliser(request: Request, next: Next) -> Response {
    let api = is_api_path(request.uri().path());
    let response = next.run(request).await;

    let status = response.status();
    if !api || !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_ERROR_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, %status, "Could not read error body, using reason phrase");
            Default::default()
        }
    };
    let text = String::from_utf8_lossy(&bytes).trim().to_string();
    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        text
    };

    parts.headers.remove(header::CONTENT_TYPE);
    parts.headers.remove(header::CONTENT_LENGTH);
    (parts, Json(ErrorResponse::new(&status_code_name(status), message))).into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// `405 Method Not Allowed` → `METHOD_NOT_ALLOWED`.
fn status_code_name(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect(),
        None => format!("HTTP_{}", status.as_u16()),
    }
}
