//! HTTP transport over [`NavService`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::error;

use crate::{
    service::{NavService, PathRequest, RefreshResponse, RefreshStatus},
    source::GraphSource,
};

pub fn router<S>(service: Arc<NavService<S>>) -> Router
where
    S: GraphSource + Send + Sync + 'static,
{
    Router::new()
        .route("/api/path", post(path_handler::<S>))
        .route("/api/refresh", get(refresh_handler::<S>).post(refresh_handler::<S>))
        .route("/api/status", get(status_handler::<S>))
        .with_state(service)
}

async fn path_handler<S>(
    State(service): State<Arc<NavService<S>>>,
    Json(request): Json<PathRequest>,
) -> impl IntoResponse
where
    S: GraphSource + Send + Sync + 'static,
{
    Json(service.find_path(&request))
}

async fn refresh_handler<S>(State(service): State<Arc<NavService<S>>>) -> impl IntoResponse
where
    S: GraphSource + Send + Sync + 'static,
{
    let response = match tokio::task::spawn_blocking(move || service.refresh()).await {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "reload task aborted");
            RefreshResponse {
                status: RefreshStatus::Failed,
            }
        }
    };
    let code = if response.is_success() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response))
}

async fn status_handler<S>(State(service): State<Arc<NavService<S>>>) -> impl IntoResponse
where
    S: GraphSource + Send + Sync + 'static,
{
    Json(service.status())
}
