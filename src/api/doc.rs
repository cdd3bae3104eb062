use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::{SESSION_COOKIE, TOKEN_COOKIE};

pub const AUTH_TAG: &str = "Auth";
pub const PROCESS_TAG: &str = "Processes";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Batch Dashboard",
        description = "Read-only dashboard over batch process definitions and their run history",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::error::ValidationFieldError,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Login, logout and current user"),
        (name = PROCESS_TAG, description = "Batch processes and run history"),
    )
)]
pub struct ApiDoc;

/// Declares both credential cookies; a running server accepts exactly one of
/// them, depending on `auth.strategy`.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "tokenCookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    TOKEN_COOKIE,
                    "Signed HS256 token set by POST /api/auth/login (token strategy)",
                ))),
            );
            components.add_security_scheme(
                "sessionCookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE,
                    "Opaque session handle set by POST /api/auth/login (session strategy)",
                ))),
            );
        }
    }
}
