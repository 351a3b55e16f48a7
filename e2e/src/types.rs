//! Shared types for the e2e test framework

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A mock response the upstream will serve for the next miniprofile request
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
}

impl MockResponse {
    /// Create a miniprofile HTML response
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: "text/html; charset=UTF-8".to_string(),
            headers: Vec::new(),
        }
    }

    /// Create an error response
    pub fn error(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "text/html; charset=UTF-8".to_string(),
            headers: Vec::new(),
        }
    }

    /// Add an extra response header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Shared state for the mock Steam server
#[derive(Debug, Default)]
pub struct UpstreamState {
    /// Queue of responses to serve - tests push responses, upstream pops and serves them
    pub response_queue: VecDeque<MockResponse>,
    /// All requests received by the upstream (for inspection)
    pub received_requests: Vec<ReceivedRequest>,
}

/// A request received by the mock upstream
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub query: Option<String>,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
}

pub type SharedUpstreamState = Arc<Mutex<UpstreamState>>;

/// Response as seen by the client
#[derive(Debug)]
pub struct ProxyResponse {
    pub status: u16,
    pub headers: reqwest::header::HeaderMap,
    pub body: String,
}

impl ProxyResponse {
    /// Get a header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
