//! In-process HTTP tests of the full router against a seeded SQLite file.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::api::dto::{ProcessResponse, RunResponse};
use crate::api::middleware::REQUEST_ID_HEADER;
use crate::api::routes::create_router;
use crate::auth::{Authenticator, CREDENTIAL_VALIDITY};
use crate::config::{AuthConfig, CredentialKind};
use crate::db::test_support::seeded_store;
use crate::state::AppState;
use crate::utils::jwt::decode_token;

const SECRET: &str = "test-secret-0123456789abcdef0123456789";
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

async fn build_app(strategy: CredentialKind) -> (TempDir, Router) {
    let (dir, store) = seeded_store().await;
    let auth = Authenticator::from_config(&AuthConfig {
        strategy,
        secret: SECRET.into(),
        cookie_secure: false,
    });
    let router = create_router(AppState::new(&store, auth, STATIC_DIR));
    (dir, router)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::get(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, path: &str, body: Value, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

async fn login(app: &Router, username: &str, password: &str) -> Response {
    post_json(
        app,
        "/api/auth/login",
        json!({"username": username, "password": password}),
        None,
    )
    .await
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookie(response: &Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

/// `name=value` part of the Set-Cookie header, ready for a Cookie header.
fn cookie_pair(response: &Response) -> String {
    set_cookie(response)
        .split(';')
        .next()
        .unwrap()
        .trim()
        .to_string()
}

/// Logs in as the seeded admin and returns the cookie to send back.
async fn admin_cookie(app: &Router) -> String {
    let response = login(app, "admin", "admin123").await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_pair(&response)
}

const STRATEGIES: [CredentialKind; 2] = [CredentialKind::Token, CredentialKind::Session];

#[tokio::test]
async fn test_api_without_credential_is_401_json() {
    for strategy in STRATEGIES {
        let (_dir, app) = build_app(strategy).await;
        for path in [
            "/api",
            "/api/auth/me",
            "/api/processes",
            "/api/processes?q=ledger",
            "/api/processes/1/runs",
            "/api/openapi.json",
            "/api/does-not-exist",
        ] {
            let response = get(&app, path, None).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{strategy} {path}");
            assert!(response.headers().get(header::LOCATION).is_none());
            let body = body_json(response).await;
            assert_eq!(body["error"], "Not logged in", "{strategy} {path}");
        }
    }
}

#[tokio::test]
async fn test_pages_without_credential_redirect_to_login() {
    for strategy in STRATEGIES {
        let (_dir, app) = build_app(strategy).await;
        for path in ["/", "/index.html", "/reports.html", "/nested/", "/index%2ehtml"] {
            let response = get(&app, path, None).await;
            assert!(response.status().is_redirection(), "{strategy} {path}");
            assert_eq!(response.headers()[header::LOCATION], "/login.html");
        }
    }
}

#[tokio::test]
async fn test_login_page_and_assets_are_public() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    for path in ["/login.html", "/login.js", "/styles.css", "/app.js"] {
        let response = get(&app, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
}

#[tokio::test]
async fn test_login_sets_24h_cookie() {
    for strategy in STRATEGIES {
        let (_dir, app) = build_app(strategy).await;
        let response = login(&app, "admin", "admin123").await;
        assert_eq!(response.status(), StatusCode::OK);

        let header = set_cookie(&response);
        assert!(header.contains("HttpOnly"), "{header}");
        assert!(header.contains("Max-Age=86400"), "{header}");
        assert!(header.contains("Path=/"), "{header}");
        assert!(header.contains("SameSite=Lax"), "{header}");
        assert!(!header.contains("Secure"), "{header}");

        let body = body_json(response).await;
        assert_eq!(body, json!({"message": "Login successful"}));
    }
}

#[tokio::test]
async fn test_token_is_valid_for_exactly_24_hours() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;
    let token = cookie.strip_prefix("token=").unwrap();

    let claims = decode_token(token, SECRET).unwrap();
    assert_eq!(claims.exp - claims.iat, CREDENTIAL_VALIDITY.as_secs());
    assert_eq!(claims.username, "admin");
}

#[tokio::test]
async fn test_session_handle_is_opaque() {
    let (_dir, app) = build_app(CredentialKind::Session).await;
    let cookie = admin_cookie(&app).await;
    let sid = cookie.strip_prefix("sid=").unwrap();

    assert_eq!(sid.len(), 48);
    assert!(sid.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_failed_logins_are_indistinguishable() {
    for strategy in STRATEGIES {
        let (_dir, app) = build_app(strategy).await;

        let wrong_password = login(&app, "admin", "not-the-password").await;
        let unknown_user = login(&app, "nobody", "admin123").await;
        let wrong_case = login(&app, "ADMIN", "admin123").await;

        for response in [&wrong_password, &unknown_user, &wrong_case] {
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert!(response.headers().get(header::SET_COOKIE).is_none());
        }

        let a = body_json(wrong_password).await;
        let b = body_json(unknown_user).await;
        let c = body_json(wrong_case).await;
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a["error"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_out_of_range_login_fails_like_wrong_password() {
    for strategy in STRATEGIES {
        let (_dir, app) = build_app(strategy).await;

        let wrong = login(&app, "admin", "not-the-password").await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        let expected = body_json(wrong).await;

        let bodies = [
            json!({"username": "admin", "password": ""}),
            json!({"username": "", "password": "admin123"}),
            json!({"username": "admin"}),
            json!({"password": "admin123"}),
            json!({}),
            json!({"username": "admin", "password": "p".repeat(1025)}),
            json!({"username": "u".repeat(257), "password": "admin123"}),
        ];
        for body in bodies {
            let response = post_json(&app, "/api/auth/login", body.clone(), None).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{body}");
            assert!(response.headers().get(header::SET_COOKIE).is_none());
            assert_eq!(body_json(response).await, expected, "{body}");
        }
    }
}

#[tokio::test]
async fn test_login_body_that_is_not_json_is_400() {
    let (_dir, app) = build_app(CredentialKind::Token).await;

    let response = send(
        &app,
        Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_me_returns_username() {
    for strategy in STRATEGIES {
        let (_dir, app) = build_app(strategy).await;
        let cookie = admin_cookie(&app).await;

        let response = get(&app, "/api/auth/me", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"username": "admin"}));
    }
}

#[tokio::test]
async fn test_rejected_artifacts() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let response = get(&app, "/api/auth/me", Some("token=garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid token");

    let response = get(&app, "/", Some("token=garbage")).await;
    assert!(response.status().is_redirection());

    let (_dir, app) = build_app(CredentialKind::Session).await;
    let response = get(&app, "/api/auth/me", Some("sid=unknown")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_cookie_of_other_strategy_is_ignored() {
    let (_dir, token_app) = build_app(CredentialKind::Token).await;
    let token_cookie = admin_cookie(&token_app).await;

    let (_dir2, session_app) = build_app(CredentialKind::Session).await;
    let response = get(&session_app, "/api/auth/me", Some(&token_cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_then_me_is_401() {
    for strategy in STRATEGIES {
        let (_dir, app) = build_app(strategy).await;
        let cookie = admin_cookie(&app).await;

        let response = post_json(&app, "/api/auth/logout", json!({}), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let removal = set_cookie(&response);
        assert!(removal.contains("Max-Age=0"), "{removal}");
        assert_eq!(body_json(response).await, json!({"message": "Logged out"}));

        // A well-behaved client has dropped the cookie.
        let response = get(&app, "/api/auth/me", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_session_logout_revokes_server_side() {
    let (_dir, app) = build_app(CredentialKind::Session).await;
    let cookie = admin_cookie(&app).await;

    post_json(&app, "/api/auth/logout", json!({}), Some(&cookie)).await;

    let response = get(&app, "/api/auth/me", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    for strategy in STRATEGIES {
        let (_dir, app) = build_app(strategy).await;
        let cookie = admin_cookie(&app).await;
        for attempt in [Some(cookie.as_str()), Some(cookie.as_str()), None] {
            let response = send(
                &app,
                {
                    let mut builder = Request::post("/api/auth/logout");
                    if let Some(cookie) = attempt {
                        builder = builder.header(header::COOKIE, cookie);
                    }
                    builder.body(Body::empty()).unwrap()
                },
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}

async fn processes(app: &Router, cookie: &str, query: Option<&str>) -> Vec<ProcessResponse> {
    let path = match query {
        Some(q) => format!("/api/processes?q={q}"),
        None => "/api/processes".to_string(),
    };
    let response = get(app, &path, Some(cookie)).await;
    assert_eq!(response.status(), StatusCode::OK, "{path}");
    serde_json::from_value(body_json(response).await).unwrap()
}

#[tokio::test]
async fn test_process_listing_fields() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;

    let response = get(&app, "/api/processes", Some(&cookie)).await;
    let body = body_json(response).await;
    let first = body.as_array().unwrap().first().unwrap().as_object().unwrap();
    for field in [
        "id",
        "name",
        "description",
        "last_run_at",
        "last_run_status",
        "next_scheduled_run",
        "schedule",
        "cron_expr",
    ] {
        assert!(first.contains_key(field), "missing {field}");
    }
}

#[tokio::test]
async fn test_search_without_match_is_empty_array() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;

    assert!(processes(&app, &cookie, Some("nomatch12345")).await.is_empty());
}

#[tokio::test]
async fn test_search_matches_name_or_description_case_insensitively() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;
    let all = processes(&app, &cookie, None).await;

    for needle in ["ledger", "LEDGER", "Export", "sync", "warehouse", "e"] {
        let lowered = needle.to_lowercase();
        let expected: Vec<&str> = all
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&lowered)
                    || p
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&lowered))
            })
            .map(|p| p.name.as_str())
            .collect();

        let found = processes(&app, &cookie, Some(needle)).await;
        let found: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(found, expected, "q={needle}");
        assert!(!found.is_empty(), "q={needle}");
    }
}

#[tokio::test]
async fn test_wildcards_in_query_are_literal() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;

    assert!(processes(&app, &cookie, Some("%25")).await.is_empty());
    assert!(processes(&app, &cookie, Some("_")).await.is_empty());
}

#[tokio::test]
async fn test_runs_are_most_recent_first() {
    let (_dir, app) = build_app(CredentialKind::Session).await;
    let cookie = admin_cookie(&app).await;
    let all = processes(&app, &cookie, None).await;

    let mut saw_runs = false;
    for process in &all {
        let response = get(&app, &format!("/api/processes/{}/runs", process.id), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let runs: Vec<RunResponse> = serde_json::from_value(body_json(response).await).unwrap();

        saw_runs |= !runs.is_empty();
        assert!(runs.iter().all(|r| r.process_id == process.id));
        for pair in runs.windows(2) {
            assert!(pair[0].started >= pair[1].started, "{:?}", pair);
        }
    }
    assert!(saw_runs);
}

#[tokio::test]
async fn test_unknown_or_malformed_process_id_is_empty() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;

    for path in ["/api/processes/999999/runs", "/api/processes/abc/runs"] {
        let response = get(&app, path, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(body_json(response).await, json!([]));
    }
}

#[tokio::test]
async fn test_authenticated_page_is_served() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;

    let response = get(&app, "/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_framework_errors_on_api_are_json() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;

    let response = get(&app, "/api/does-not-exist", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    let response = get(&app, "/api/auth/login", None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_openapi_document_behind_gate() {
    let (_dir, app) = build_app(CredentialKind::Token).await;
    let cookie = admin_cookie(&app).await;

    let response = get(&app, "/api/openapi.json", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/processes"].is_object());
    assert!(doc["paths"]["/api/processes/{id}/runs"].is_object());
    assert!(doc["components"]["securitySchemes"]["tokenCookie"].is_object());
}

#[tokio::test]
async fn test_every_response_has_request_id() {
    let (_dir, app) = build_app(CredentialKind::Token).await;

    for response in [
        get(&app, "/api/processes", None).await,
        get(&app, "/", None).await,
        get(&app, "/login.html", None).await,
    ] {
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
