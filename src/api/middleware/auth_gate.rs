//! Credential gate in front of every route.
//!
//! Requests are sorted into three classes by path. `Public` ones pass
//! untouched. `Api` and `Page` requests must carry a credential the active
//! strategy accepts; on success the [`Identity`] is stored in the request
//! extensions, otherwise API clients get a 401 JSON body and browsers are
//! redirected to the login page.
//!
//! [`Identity`]: crate::auth::Identity

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::state::AppState;

pub const LOGIN_PAGE: &str = "/login.html";

/// Reachable without a credential, or nobody could ever log in.
const PUBLIC_PATHS: &[&str] = &[LOGIN_PAGE, "/api/auth/login", "/api/auth/logout"];

/// Static asset extensions served without a credential.
const ASSET_EXTENSIONS: &[&str] = &[
    "js", "mjs", "css", "map", "png", "jpg", "jpeg", "gif", "svg", "ico", "webp", "woff",
    "woff2", "ttf", "txt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Api,
    Page,
}

pub fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Classifies a request path.
///
/// Anything outside `/api` that is neither allow-listed nor a static asset
/// counts as a page. Percent-encoded paths are never treated as assets, since
/// the file server decodes them before lookup.
pub fn classify(path: &str) -> Access {
    if PUBLIC_PATHS.contains(&path) {
        Access::Public
    } else if is_api_path(path) {
        Access::Api
    } else if is_static_asset(path) {
        Access::Public
    } else {
        Access::Page
    }
}

fn is_static_asset(path: &str) -> bool {
    if path.contains('%') || path.ends_with('/') {
        return false;
    }
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ASSET_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        _ => false,
    }
}

pub async fn auth_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let access = classify(request.uri().path());
    if access == Access::Public {
        return next.run(request).await;
    }

    match state.auth.verify_request(request.headers()).await {
        Ok(identity) => {
            tracing::debug!(username = %identity.username, "Credential accepted");
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(error) => {
            tracing::debug!(
                path = %request.uri().path(),
                reason = %error,
                ?access,
                "Credential rejected"
            );
            match access {
                Access::Api => error.into_response(),
                _ => Redirect::to(LOGIN_PAGE).into_response(),
            }
        }
    }
}
