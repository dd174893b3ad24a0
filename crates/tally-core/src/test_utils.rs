//! Test utilities for tally-core
//!
//! This module provides testing infrastructure including a mock
//! chat-completions server that replays scripted replies and records what it
//! received.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::sync::oneshot;

/// One scripted reply of the mock server
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 with `choices[0].message.content`
    Content(String),
    /// Arbitrary status and raw body
    Raw { status: u16, body: String },
    /// Sleep before answering with the inner reply
    Delayed(Duration, Box<MockReply>),
}

impl MockReply {
    pub fn content(text: &str) -> Self {
        MockReply::Content(text.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        MockReply::Raw {
            status,
            body: body.to_string(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::raw(
            401,
            r#"{"error":{"message":"Incorrect API key provided","code":401}}"#,
        )
    }

    pub fn server_error() -> Self {
        Self::raw(500, r#"{"error":{"message":"Internal server error"}}"#)
    }

    pub fn delayed(delay: Duration, inner: MockReply) -> Self {
        MockReply::Delayed(delay, Box::new(inner))
    }
}

/// What the mock server saw for one request
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub referer: Option<String>,
    pub title: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Default)]
struct MockState {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock OpenAI-compatible server for testing and development
pub struct MockChatServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockChatServer {
    /// Start the mock server on an available port with scripted replies
    ///
    /// Replies are served in order; once exhausted every request gets a 500.
    pub async fn start(replies: Vec<MockReply>) -> Self {
        let state = Arc::new(MockState {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/chat/completions", post(handle_completion))
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

    /// Base URL to use as `ProviderConfig::base_url`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_completion(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        authorization: header("authorization"),
        referer: header("http-referer"),
        title: header("x-title"),
        body,
    });

    let reply = state.replies.lock().unwrap().pop_front();
    match reply {
        Some(reply) => render(reply).await,
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no scripted reply").into_response(),
    }
}

async fn render(mut reply: MockReply) -> Response {
    while let MockReply::Delayed(delay, inner) = reply {
        tokio::time::sleep(delay).await;
        reply = *inner;
    }

    match reply {
        MockReply::Content(text) => Json(serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": "mock",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        MockReply::Raw { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, body).into_response()
        }
        MockReply::Delayed(..) => unreachable!("delays are unwrapped above"),
    }
}
