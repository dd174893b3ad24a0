//! Chat completion transport
//!
//! The transport performs exactly one request per call and classifies every
//! failure into a [`CompletionError`]. It never retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::Result;

use super::provider::ProviderConfig;

/// Classified failure of a single completion call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// 401 status, or an error envelope carrying code 401
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("empty response from AI")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    Malformed(String),

    /// The request could not be built (e.g. a prompt is missing)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl CompletionError {
    pub fn is_auth(&self) -> bool {
        matches!(self, CompletionError::Unauthorized(_))
    }

    /// Short label for structured logs
    pub fn class(&self) -> &'static str {
        match self {
            CompletionError::Unauthorized(_) => "auth",
            CompletionError::Status { .. } => "status",
            CompletionError::Timeout => "timeout",
            CompletionError::Transport(_) => "transport",
            CompletionError::EmptyResponse => "empty",
            CompletionError::Malformed(_) => "malformed",
            CompletionError::InvalidRequest(_) => "request",
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout
        } else if err.status().map(|s| s.as_u16()) == Some(401) {
            CompletionError::Unauthorized(err.to_string())
        } else {
            CompletionError::Transport(err.to_string())
        }
    }
}

/// Chat completion request body
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// System instruction followed by a user instruction
    pub fn new(model: &str, system: &str, user: &str, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature,
            max_tokens,
        }
    }

    /// Content of the user message
    pub fn user_content(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }

    /// Content of the system message
    pub fn system_content(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Chat completion choice
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Chat response message (content is null for refusals and tool calls)
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Error envelope returned by both backends
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ErrorBody {
    fn is_auth(&self) -> bool {
        match &self.code {
            Some(serde_json::Value::Number(n)) => n.as_u64() == Some(401),
            Some(serde_json::Value::String(s)) => s == "401",
            _ => false,
        }
    }
}

/// Sends one chat completion and returns the first choice's text
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> std::result::Result<String, CompletionError>;
}

/// reqwest-backed transport for OpenAI-compatible endpoints
#[derive(Clone)]
pub struct HttpTransport {
    http_client: Client,
    url: String,
    api_key: Option<String>,
    extra_headers: Vec<(String, String)>,
}

impl HttpTransport {
    /// Build a transport for the given configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            url: config.completions_url(),
            api_key: config.api_key().map(str::to_string),
            extra_headers: config.extra_headers.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(&self, request: &ChatRequest) -> std::result::Result<String, CompletionError> {
        let mut req_builder = self.http_client.post(&self.url).json(request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }
        for (name, value) in &self.extra_headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        let response = req_builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), bytes = body.len(), "Chat completion response");

        classify_response(status.as_u16(), &body)
    }
}

/// Turn a raw HTTP status and body into the first choice's content
pub(crate) fn classify_response(
    status: u16,
    body: &str,
) -> std::result::Result<String, CompletionError> {
    // OpenRouter can report auth errors in the body, so check the envelope first
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let message = envelope
            .error
            .message
            .clone()
            .unwrap_or_else(|| "unknown error".to_string());
        if status == 401 || envelope.error.is_auth() {
            return Err(CompletionError::Unauthorized(message));
        }
        return Err(CompletionError::Status {
            status,
            body: truncate(&message, 200),
        });
    }

    if status == 401 {
        return Err(CompletionError::Unauthorized(truncate(body, 200)));
    }
    if !(200..300).contains(&status) {
        return Err(CompletionError::Status {
            status,
            body: truncate(body, 200),
        });
    }

    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::Malformed(format!("invalid completion body: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(CompletionError::EmptyResponse)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AiSettings;
    use crate::test_utils::{MockChatServer, MockReply};

    fn configured(url: &str) -> ProviderConfig {
        ProviderConfig::resolve(None, Some("test-key".into()), None, &AiSettings::default())
            .with_base_url(url)
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest::new("gpt-3.5-turbo", "sys", "hello", 0.7, 1000);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "sys");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 1000);
        let temp = json["temperature"].as_f64().unwrap();
        assert!((temp - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_classify_success() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Food"}}]}"#;
        assert_eq!(classify_response(200, body).unwrap(), "Food");
    }

    #[test]
    fn test_classify_null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(classify_response(200, body), Err(CompletionError::EmptyResponse));
    }

    #[test]
    fn test_classify_no_choices_is_empty() {
        assert_eq!(
            classify_response(200, r#"{"choices":[]}"#),
            Err(CompletionError::EmptyResponse)
        );
    }

    #[test]
    fn test_classify_garbage_body() {
        let err = classify_response(200, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.class(), "malformed");
    }

    #[test]
    fn test_classify_401_status() {
        let err = classify_response(401, "Unauthorized").unwrap_err();
        assert!(err.is_auth());
    }

    #[test]
    fn test_classify_401_code_in_envelope() {
        let body = r#"{"error":{"message":"No auth credentials found","code":401}}"#;
        let err = classify_response(200, body).unwrap_err();
        assert!(err.is_auth());
    }

    #[test]
    fn test_classify_server_error() {
        let body = r#"{"error":{"message":"overloaded","code":"server_error"}}"#;
        let err = classify_response(500, body).unwrap_err();
        assert!(!err.is_auth());
        assert!(matches!(err, CompletionError::Status { status: 500, .. }));
    }

    #[test]
    fn test_truncate_long_body() {
        let long = "x".repeat(300);
        let err = classify_response(502, &long).unwrap_err();
        match err {
            CompletionError::Status { body, .. } => assert_eq!(body.len(), 203),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_transport_sends_auth_and_headers() {
        let server = MockChatServer::start(vec![MockReply::content("Bills")]).await;
        let config = ProviderConfig::resolve(
            Some("or-key".into()),
            None,
            Some("https://tally.test".into()),
            &AiSettings::default(),
        )
        .with_base_url(&server.url());
        let transport = HttpTransport::new(&config).unwrap();

        let request = ChatRequest::new(&config.model, "sys", "user", 0.1, 20);
        let reply = transport.complete(&request).await.unwrap();
        assert_eq!(reply, "Bills");

        let seen = server.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer or-key"));
        assert_eq!(seen[0].referer.as_deref(), Some("https://tally.test"));
        assert_eq!(seen[0].title.as_deref(), Some("ExpenseTracker AI"));
        assert_eq!(seen[0].body["model"], "gpt-4.1");
    }

    #[tokio::test]
    async fn test_http_transport_openai_has_no_extra_headers() {
        let server = MockChatServer::start(vec![MockReply::content("ok")]).await;
        let config = configured(&server.url());
        let transport = HttpTransport::new(&config).unwrap();

        let request = ChatRequest::new(&config.model, "sys", "user", 0.1, 20);
        transport.complete(&request).await.unwrap();

        let seen = server.requests();
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer test-key"));
        assert!(seen[0].referer.is_none());
        assert!(seen[0].title.is_none());
    }

    #[tokio::test]
    async fn test_http_transport_unauthorized() {
        let server = MockChatServer::start(vec![MockReply::unauthorized()]).await;
        let transport = HttpTransport::new(&configured(&server.url())).unwrap();

        let request = ChatRequest::new("m", "sys", "user", 0.1, 20);
        let err = transport.complete(&request).await.unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_http_transport_unreachable() {
        let config = configured("http://127.0.0.1:1");
        let transport = HttpTransport::new(&config).unwrap();

        let request = ChatRequest::new("m", "sys", "user", 0.1, 20);
        let err = transport.complete(&request).await.unwrap_err();
        assert!(!err.is_auth());
    }

    #[tokio::test]
    async fn test_http_transport_timeout() {
        let server = MockChatServer::start(vec![MockReply::delayed(
            std::time::Duration::from_secs(5),
            MockReply::content("too late"),
        )])
        .await;
        let mut config = configured(&server.url());
        config.timeout = std::time::Duration::from_millis(200);
        let transport = HttpTransport::new(&config).unwrap();

        let request = ChatRequest::new("m", "sys", "user", 0.1, 20);
        let err = transport.complete(&request).await.unwrap_err();
        assert_eq!(err, CompletionError::Timeout);
    }
}
