//! Test utilities for tally-core
//!
//! Provides a mock remote analysis endpoint that can be used for development
//! and integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// How long `/slow` waits before answering
pub const SLOW_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<Value>>>,
    flaky_hits: Arc<AtomicUsize>,
}

/// Mock analysis server for testing and development
///
/// Routes:
/// - `POST /analyze` records the body and answers with a row count
/// - `GET /analyze` health check
/// - `POST /fail` and `GET /fail` always answer 500
/// - `POST /slow` answers after [`SLOW_DELAY`]
/// - `GET /flaky` answers 503 on the first hit and 200 afterwards
pub struct MockAnalysisServer {
    addr: SocketAddr,
    state: MockState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAnalysisServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/analyze", post(handle_analyze).get(handle_health))
            .route("/fail", post(handle_fail).get(handle_fail))
            .route("/slow", post(handle_slow))
            .route("/flaky", get(handle_flaky))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL of a route on this server, e.g. `endpoint("/analyze")`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }

    /// Bodies received by `POST /analyze`, oldest first
    pub fn received(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Number of hits on `GET /flaky`
    pub fn flaky_hits(&self) -> usize {
        self.state.flaky_hits.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAnalysisServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_analyze(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    let row_count = body["rows"].as_array().map(|rows| rows.len()).unwrap_or(0);
    state.requests.lock().unwrap().push(body);

    Json(json!({
        "rowsReceived": row_count,
        "insight": format!("Analyzed {} rows", row_count),
    }))
}

async fn handle_health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn handle_fail() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "analysis backend unavailable"})),
    )
}

async fn handle_slow() -> Json<Value> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(json!({"insight": "too late"}))
}

async fn handle_flaky(State(state): State<MockState>) -> StatusCode {
    if state.flaky_hits.fetch_add(1, Ordering::SeqCst) == 0 {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts() {
        let server = MockAnalysisServer::start().await;
        assert!(server.url().starts_with("http://127.0.0.1:"));
        assert!(server.received().is_empty());
    }
}
