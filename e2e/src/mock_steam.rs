//! Mock upstream server that simulates steamcommunity.com
//!
//! Only `/miniprofile/{id}` is served. Tests pre-configure responses via
//! SharedUpstreamState before each request; without one queued, a small
//! miniprofile fragment echoing the account id is returned.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::types::{UpstreamState, MockResponse, ReceivedRequest, SharedUpstreamState};

/// Default fragment when no response is queued
fn default_miniprofile_response(account_id: &str) -> MockResponse {
    MockResponse::html(format!(
        r#"<div class="miniprofile_container" data-miniprofile="{account_id}"><span class="persona">mock</span></div>"#
    ))
    .with_header("Cache-Control", "no-cache")
    .with_header("Access-Control-Allow-Origin", "https://steamcommunity.com")
}

/// Handle GET /miniprofile/{id} - serves pre-configured mock responses
async fn handle_miniprofile(
    State(state): State<SharedUpstreamState>,
    Path(account_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(String::from);

    let received = ReceivedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        cookie: header("cookie"),
        user_agent: header("user-agent"),
    };

    // Pop the next configured response (or use default)
    let mock_response = {
        let mut state = state.lock().unwrap();
        state.received_requests.push(received);
        state
            .response_queue
            .pop_front()
            .unwrap_or_else(|| default_miniprofile_response(&account_id))
    };

    let mut builder = Response::builder()
        .status(mock_response.status)
        .header("Content-Type", &mock_response.content_type);
    for (name, value) in &mock_response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder
        .body(Body::from(mock_response.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Start the mock upstream server and return the shared state handle
pub async fn start(port: u16) -> anyhow::Result<SharedUpstreamState> {
    let state: SharedUpstreamState = std::sync::Arc::new(std::sync::Mutex::new(UpstreamState::default()));

    let app = Router::new()
        .route("/miniprofile/:id", get(handle_miniprofile))
        .with_state(state.clone());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await
        .map_err(|e| anyhow::anyhow!("Failed to bind mock upstream to {}: {}", addr, e))?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock upstream server failed");
    });

    // Brief pause to let the server start accepting connections
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    Ok(state)
}

/// Helper to configure the next response for /miniprofile/{id}
pub fn queue_response(state: &SharedUpstreamState, response: MockResponse) {
    state.lock().unwrap().response_queue.push_back(response);
}

/// Helper to get all requests received since last clear
pub fn drain_requests(state: &SharedUpstreamState) -> Vec<ReceivedRequest> {
    let mut s = state.lock().unwrap();
    s.received_requests.drain(..).collect()
}
