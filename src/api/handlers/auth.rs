//! Login, logout and current-user handlers.

use axum::{Extension, Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{ErrorResponse, LoginRequest, MeResponse, MessageResponse};
use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// # Routes
/// - `POST /api/auth/login` - exchange username/password for a credential cookie
/// - `POST /api/auth/logout` - drop the credential
/// - `GET /api/auth/me` - name of the logged-in user
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(logout))
        .routes(routes!(me))
}

/// Authenticates and sets the credential cookie.
///
/// Unknown usernames, wrong passwords and empty or oversize fields all
/// produce the same 401 body. Only a body that is not JSON gets a 400.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, credential cookie set", body = MessageResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<ValidatedJson<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    let payload = match body {
        Ok(ValidatedJson(payload)) => payload,
        Err(AppError::ValidationErrors { errors }) => {
            tracing::info!(fields = errors.len(), "Login rejected by length rules");
            return Err(AppError::InvalidCredentials);
        }
        Err(other) => return Err(other),
    };
    let identity = state
        .services
        .auth
        .authenticate(&payload.username, &payload.password)
        .await?;
    let jar = state.auth.login(jar, &identity).await?;
    Ok((jar, Json(MessageResponse::new("Login successful"))))
}

/// Revokes the current credential, if any, and clears the cookie.
/// Always succeeds.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    )
)]
async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = state.auth.logout(jar).await;
    (jar, Json(MessageResponse::new("Logged out")))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    security(
        ("tokenCookie" = []),
        ("sessionCookie" = [])
    )
)]
async fn me(Extension(identity): Extension<Identity>) -> Json<MeResponse> {
    Json(MeResponse {
        username: identity.username,
    })
}
