//! Read-only process listing and run history.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PROCESS_TAG;
use crate::api::dto::{ErrorResponse, ProcessQuery, ProcessResponse, RunResponse};
use crate::error::AppResult;
use crate::state::AppState;

/// # Routes
/// - `GET /api/processes` - every process, optionally filtered by `q`
/// - `GET /api/processes/{id}/runs` - run history, most recent first
pub fn process_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_processes))
        .routes(routes!(list_process_runs))
}

#[utoipa::path(
    get,
    path = "/api/processes",
    tag = PROCESS_TAG,
    params(ProcessQuery),
    responses(
        (status = 200, description = "Matching processes; empty when nothing matches", body = Vec<ProcessResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    security(
        ("tokenCookie" = []),
        ("sessionCookie" = [])
    )
)]
async fn list_processes(
    State(state): State<AppState>,
    Query(query): Query<ProcessQuery>,
) -> AppResult<Json<Vec<ProcessResponse>>> {
    let processes = state
        .services
        .processes
        .list_processes(query.q.as_deref())
        .await?;
    Ok(Json(processes.into_iter().map(ProcessResponse::from).collect()))
}

/// Runs are ordered by `started` descending, ties by insertion order.
/// An unknown or non-numeric id yields an empty array.
#[utoipa::path(
    get,
    path = "/api/processes/{id}/runs",
    tag = PROCESS_TAG,
    params(
        ("id" = String, Path, description = "Process ID")
    ),
    responses(
        (status = 200, description = "Run history, most recent first", body = Vec<RunResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    security(
        ("tokenCookie" = []),
        ("sessionCookie" = [])
    )
)]
async fn list_process_runs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<RunResponse>>> {
    let runs = state.services.processes.list_runs(&id).await?;
    Ok(Json(runs.into_iter().map(RunResponse::from).collect()))
}
