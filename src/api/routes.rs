//! Router configuration for the API and the static presentation layer.

use axum::{Json, Router, middleware, routing::get};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    api_error_normaliser, auth_gate, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the application router.
///
/// # Middleware Order
/// Last added runs first, so a request passes through:
/// 1. request id
/// 2. request logging
/// 3. API error normaliser
/// 4. auth gate
///
/// The gate and the normaliser wrap the static file fallback too, which keeps
/// pages behind the login and turns unknown `/api` paths into JSON 404s.
///
/// # Routes
/// - `/api/auth/*` - login, logout, current user
/// - `/api/processes` and `/api/processes/{id}/runs`
/// - `/api/openapi.json` - generated OpenAPI document
/// - everything else - files under `web.static_dir`
pub fn create_router(state: AppState) -> Router {
    let (api_routes, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::auth::auth_routes())
        .merge(handlers::processes::process_routes())
        .split_for_parts();

    api_routes
        .route(
            "/api/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        )
        .fallback_service(ServeDir::new(&state.static_dir))
        .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
        .layer(middleware::from_fn(api_error_normaliser))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
