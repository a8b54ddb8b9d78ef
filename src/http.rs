//! The JSON/REST interface exposing the service façade.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::model::{Status, TaskConfig};
use crate::service::Service;

/// Maximum accepted request body size.
pub const MAX_BODY_BYTES: usize = 1_000_000;

pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/v1/task", post(create_task))
        .route("/v1/task/:id/status", get(task_status))
        .route("/v1/task/:id/kill", get(kill_task))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            ServiceError::TaskNotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::IdGeneration { .. } | ServiceError::TaskConstruction => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.client_message()).into_response()
    }
}

async fn create_task(
    State(service): State<Arc<Service>>,
    Json(config): Json<TaskConfig>,
) -> Result<(StatusCode, Json<String>), ServiceError> {
    let id = service.create_task(config).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

async fn task_status(
    State(service): State<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<crate::model::WorkerResult>>, ServiceError> {
    let status = service.task_status_or_err(&id).await?;
    Ok(Json(status.results))
}

/// Response is filtered to entries whose status is `killed`.
async fn kill_task(
    State(service): State<Arc<Service>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<crate::model::WorkerResult>>, ServiceError> {
    let status = service.kill_task_or_err(&id).await?;
    let killed = status
        .results
        .into_iter()
        .filter(|r| r.status == Status::Killed)
        .collect();
    Ok(Json(killed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::UuidGenerator;
    use crate::remote::mock::{MockRemoteClient, Scripted};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    fn app() -> Router {
        let client = Arc::new(MockRemoteClient::new());
        client.script("addr1", Scripted::BlockUntilCancelled("killed"));
        let service = Arc::new(Service::new(
            client,
            vec!["addr0".to_string(), "addr1".to_string()],
            Box::new(UuidGenerator),
        ));
        router(service)
    }

    #[tokio::test]
    async fn create_task_returns_201_and_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/task")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "client_id": "c",
                            "info": "i",
                            "mode": "sequential",
                            "failonerror": false,
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn status_for_unknown_task_is_404() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/v1/task/does-not-exist/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn kill_endpoint_filters_to_killed_only() {
        let app = app();
        let create = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/task")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "client_id": "c",
                            "info": "i",
                            "mode": "parallel",
                            "failonerror": false,
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = axum::body::to_bytes(create.into_body(), usize::MAX)
            .await
            .unwrap();
        let id: String = serde_json::from_slice(&body).unwrap();

        // addr0 resolves success quickly; addr1 blocks until we kill it.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let kill = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/v1/task/{id}/kill"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(kill.status(), StatusCode::OK);
        let body = axum::body::to_bytes(kill.into_body(), usize::MAX)
            .await
            .unwrap();
        let results: Vec<crate::model::WorkerResult> = serde_json::from_slice(&body).unwrap();
        assert!(results.iter().all(|r| r.status == Status::Killed));
        assert!(!results.is_empty());
    }
}
