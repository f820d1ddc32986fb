use std::{net::SocketAddr, sync::Arc};

use floorgraph::{
    EdgeRecord, GraphSource, NavGraphError, NavService, NodeRecord, SqliteSource, http::router,
};
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

fn seeded_service() -> Arc<NavService<SqliteSource>> {
    let source = SqliteSource::open_in_memory().unwrap();
    for node in [
        NodeRecord::new("A", 1, 0, 0, "hallway", Some("all")),
        NodeRecord::new("B", 1, 3, 0, "hallway", Some("all")),
        NodeRecord::new("C", 2, 3, 0, "elevator", Some("employee")),
        NodeRecord::new("D", 2, 6, 0, "room", Some("all")),
    ] {
        source.insert_node(&node).unwrap();
    }
    for (a, b) in [("A", "B"), ("B", "C"), ("C", "D")] {
        source.insert_edge(&EdgeRecord::new(a, b)).unwrap();
    }
    Arc::new(NavService::new(source))
}

async fn serve<S>(service: Arc<NavService<S>>) -> SocketAddr
where
    S: GraphSource + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(service)).await.unwrap();
    });
    addr
}

async fn post_path(addr: SocketAddr, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/path"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn refresh_then_path_query() {
    let addr = serve(seeded_service()).await;
    let response = reqwest::get(format!("http://{addr}/api/refresh"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"status": "refreshed"})
    );

    let request = json!({"start": "A", "end": "D", "role": "employee"});
    let (status, body) = post_path(addr, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"path": ["A", "B", "C", "D"]}));
}

#[tokio::test]
async fn blocked_route_returns_null_path() {
    let service = seeded_service();
    service.reload().unwrap();
    let addr = serve(service).await;
    let request = json!({"start": "A", "end": "D", "role": "student"});
    let (status, body) = post_path(addr, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"path": null}));
}

#[tokio::test]
async fn missing_role_is_treated_as_general() {
    let service = seeded_service();
    service.reload().unwrap();
    let addr = serve(service).await;
    let (_, body) = post_path(addr, json!({"start": "A", "end": "B"})).await;
    assert_eq!(body, json!({"path": ["A", "B"]}));
}

#[tokio::test]
async fn status_reports_loaded_generation() {
    let service = seeded_service();
    service.reload().unwrap();
    let addr = serve(service).await;
    let response = reqwest::get(format!("http://{addr}/api/status"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["generation"], 1);
    assert_eq!(body["node_count"], 4);
    assert_eq!(body["edge_count"], 3);
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let addr = serve(seeded_service()).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/path"))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"start\": 1")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

struct BrokenSource;

impl GraphSource for BrokenSource {
    fn fetch_nodes(&self) -> Result<Vec<NodeRecord>, NavGraphError> {
        Err(NavGraphError::connection("database went away"))
    }

    fn fetch_edges(&self) -> Result<Vec<EdgeRecord>, NavGraphError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn failed_refresh_is_reported_as_unavailable() {
    let addr = serve(Arc::new(NavService::new(BrokenSource))).await;
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/refresh"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"status": "failed"})
    );
}
