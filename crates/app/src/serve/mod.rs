//! HTTP JSON API for the lab: experiment catalog and learner progress.
//!
//! Endpoints:
//! - GET  /health                                  - Server status
//! - GET  /api/experiments                         - Catalog summaries
//! - GET  /api/experiments/{id}                    - Full experiment with steps
//! - GET  /api/progress/{user_id}                  - Every record for a learner
//! - GET  /api/progress/{user_id}/{experiment_id}  - One record, 404 when absent
//! - POST /api/progress                            - Upsert a partial record
//!
//! CORS is permissive so the browser client can be served from another origin.

mod handlers;
mod state;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use services::AppServices;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_get_experiment, handle_get_progress, handle_health, handle_list_experiments,
    handle_list_progress, handle_not_found, handle_save_progress,
};
use self::state::AppState;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({ "error": message })))
}

pub fn router(services: &AppServices) -> Router {
    let state = Arc::new(AppState::new(services));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/experiments", get(handle_list_experiments))
        .route("/api/experiments/{id}", get(handle_get_experiment))
        .route("/api/progress", post(handle_save_progress))
        .route("/api/progress/{user_id}", get(handle_list_progress))
        .route(
            "/api/progress/{user_id}/{experiment_id}",
            get(handle_get_progress),
        )
        .fallback(handle_not_found)
        .layer(cors)
        .with_state(state)
}

/// Serve the API on an already-bound listener until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, services: &AppServices) -> std::io::Result<()> {
    let app = router(services);
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "lab server listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("lab server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}

#[cfg(test)]
mod tests {
    use super::*;

    use lab_core::model::{ExperimentId, ProgressUpdate, UserId};
    use lab_core::time::fixed_now;
    use services::{Clock, HttpProgressClient, ProgressClient};
    use storage::catalog::ExperimentCatalog;

    async fn spawn_server() -> String {
        let services =
            AppServices::in_memory(Clock::fixed(fixed_now()), ExperimentCatalog::bundled().unwrap());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(&services);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn progress_round_trips_over_http() {
        let base = spawn_server().await;
        let client = HttpProgressClient::new(&base).unwrap();
        let user = UserId::new("u1").unwrap();
        let exp = ExperimentId::new(9).unwrap();

        assert!(client.fetch_progress(&user, exp).await.unwrap().is_none());

        let saved = client
            .save_progress(ProgressUpdate::new(user.clone(), exp).with_current_step(1))
            .await
            .unwrap();
        assert!(!saved.completed);
        assert_eq!(saved.progress_percentage, 0);

        client
            .save_progress(ProgressUpdate::new(user.clone(), exp).with_completed(true))
            .await
            .unwrap();
        let fetched = client.fetch_progress(&user, exp).await.unwrap().unwrap();
        assert_eq!(fetched.current_step, 1);
        assert!(fetched.completed);
        assert_eq!(fetched.last_updated, fixed_now());

        let listed = client.list_progress(&user).await.unwrap();
        assert_eq!(listed, vec![fetched]);
    }

    #[tokio::test]
    async fn user_ids_with_reserved_characters_survive_the_path() {
        let base = spawn_server().await;
        let client = HttpProgressClient::new(&base).unwrap();
        let user = UserId::new("lab bench/7").unwrap();
        let exp = ExperimentId::new(2).unwrap();

        client
            .save_progress(ProgressUpdate::new(user.clone(), exp).with_current_step(4))
            .await
            .unwrap();
        let fetched = client.fetch_progress(&user, exp).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, user);
    }

    #[tokio::test]
    async fn dotted_user_ids_reach_their_own_record() {
        let base = spawn_server().await;
        let client = HttpProgressClient::new(&base).unwrap();
        let exp = ExperimentId::new(9).unwrap();
        let dotted = UserId::new("...").unwrap();
        let other = UserId::new("9").unwrap();

        client
            .save_progress(ProgressUpdate::new(other.clone(), exp).with_current_step(2))
            .await
            .unwrap();
        assert!(client.fetch_progress(&dotted, exp).await.unwrap().is_none());

        client
            .save_progress(ProgressUpdate::new(dotted.clone(), exp).with_current_step(4))
            .await
            .unwrap();
        let fetched = client.fetch_progress(&dotted, exp).await.unwrap().unwrap();
        assert_eq!(fetched.user_id, dotted);
        assert_eq!(fetched.current_step, 4);
        assert_eq!(client.list_progress(&dotted).await.unwrap(), vec![fetched]);
    }

    #[tokio::test]
    async fn malformed_writes_are_rejected() {
        let base = spawn_server().await;
        let http = reqwest::Client::new();

        for body in [
            serde_json::json!({ "userId": "", "experimentId": 1 }),
            serde_json::json!({ "userId": "u1", "experimentId": 0 }),
            serde_json::json!({ "userId": "..", "experimentId": 1 }),
            serde_json::json!({ "experimentId": 1 }),
            serde_json::json!({ "userId": "u1", "experimentId": 1, "progressPercentage": 140 }),
        ] {
            let response = http
                .post(format!("{base}/api/progress"))
                .json(&body)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST, "{body}");
        }

        let response = http
            .get(format!("{base}/api/progress/u1/0"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn serves_catalog() {
        let base = spawn_server().await;
        let http = reqwest::Client::new();

        let list: serde_json::Value = http
            .get(format!("{base}/api/experiments"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(list["experiments"].as_array().unwrap().len(), 3);
        assert_eq!(list["experiments"][0]["stepCount"], 6);

        let experiment: serde_json::Value = http
            .get(format!("{base}/api/experiments/2"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(experiment["category"], "equilibrium");
        assert_eq!(experiment["steps"].as_array().unwrap().len(), 5);

        let missing = http
            .get(format!("{base}/api/experiments/99"))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

        let unknown = http.get(format!("{base}/nope")).send().await.unwrap();
        assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
