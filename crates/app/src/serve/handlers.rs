//! Route handlers: health, experiment catalog, progress.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lab_core::model::{ExperimentId, ProgressUpdate, UserId};
use services::ProgressServiceError;

use super::json_error;
use super::state::AppState;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// GET /api/experiments
pub(crate) async fn handle_list_experiments(
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let experiments = state.catalog.list_experiments();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "experiments": experiments })),
    )
}

/// GET /api/experiments/{id}
pub(crate) async fn handle_get_experiment(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    let id = match raw_id.parse::<ExperimentId>() {
        Ok(id) => id,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };

    match state.catalog.get_experiment(id) {
        Ok(experiment) => (StatusCode::OK, Json(experiment)).into_response(),
        Err(e) => json_error(StatusCode::NOT_FOUND, &e.to_string()).into_response(),
    }
}

/// GET /api/progress/{user_id}
pub(crate) async fn handle_list_progress(
    State(state): State<Arc<AppState>>,
    Path(raw_user): Path<String>,
) -> Response {
    let user_id = match raw_user.parse::<UserId>() {
        Ok(id) => id,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };

    match state.progress.list_progress(&user_id).await {
        Ok(progress) => (
            StatusCode::OK,
            Json(serde_json::json!({ "progress": progress })),
        )
            .into_response(),
        Err(e) => service_error(&e),
    }
}

/// GET /api/progress/{user_id}/{experiment_id}
pub(crate) async fn handle_get_progress(
    State(state): State<Arc<AppState>>,
    Path((raw_user, raw_experiment)): Path<(String, String)>,
) -> Response {
    let user_id = match raw_user.parse::<UserId>() {
        Ok(id) => id,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };
    let experiment_id = match raw_experiment.parse::<ExperimentId>() {
        Ok(id) => id,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response(),
    };

    match state.progress.get_progress(&user_id, experiment_id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "no progress recorded").into_response(),
        Err(e) => service_error(&e),
    }
}

/// POST /api/progress
///
/// Malformed keys are rejected with 400 before reaching the store.
pub(crate) async fn handle_save_progress(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ProgressUpdate>, JsonRejection>,
) -> Response {
    let update = match body {
        Ok(Json(update)) => update,
        Err(rejection) => {
            return json_error(StatusCode::BAD_REQUEST, &rejection.body_text()).into_response();
        }
    };

    match state.progress.save_progress(update).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => service_error(&e),
    }
}

fn service_error(err: &ProgressServiceError) -> Response {
    match err {
        ProgressServiceError::Progress(e) => {
            json_error(StatusCode::BAD_REQUEST, &e.to_string()).into_response()
        }
        other => {
            tracing::error!(error = %other, "progress store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "progress store unavailable")
                .into_response()
        }
    }
}
