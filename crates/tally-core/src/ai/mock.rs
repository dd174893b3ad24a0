//! Mock transport for testing
//!
//! Replays scripted outcomes and counts calls, so tests can assert both the
//! operation's result and whether the network would have been touched.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::transport::{ChatRequest, ChatTransport, CompletionError};

/// Scripted in-process transport
///
/// Clones share the same script and call log.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Result<String, CompletionError>>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockTransport {
    /// Create a transport with no scripted replies (every call fails)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that answers with `text` once
    pub fn replying(text: &str) -> Self {
        Self::scripted(vec![Ok(text.to_string())])
    }

    /// Create a transport that fails once with `err`
    pub fn failing(err: CompletionError) -> Self {
        Self::scripted(vec![Err(err)])
    }

    pub fn scripted(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of completion calls made so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| Err(CompletionError::Transport("no scripted reply".into())))
    }
}
