//! Backend selection
//!
//! Two chat-completion backends are supported. The credential that is present
//! decides which one is used, in priority order:
//!
//! 1. `OPENROUTER_API_KEY` → OpenRouter (adds `HTTP-Referer` and `X-Title` headers)
//! 2. `OPENAI_API_KEY` → OpenAI
//! 3. neither → no credential; OpenAI is kept as the would-be backend
//!
//! The selection happens once, when the [`ProviderConfig`] is built.

use std::fmt;
use std::time::Duration;

use crate::settings::AiSettings;

/// Default public URL sent as `HTTP-Referer` to OpenRouter
pub const DEFAULT_APP_URL: &str = "http://localhost:4000";

/// Supported chat-completion backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    OpenRouter,
    OpenAI,
}

impl Backend {
    pub fn display_name(&self) -> &'static str {
        match self {
            Backend::OpenRouter => "OpenRouter",
            Backend::OpenAI => "OpenAI",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Backend::OpenRouter => "https://openrouter.ai/api/v1",
            Backend::OpenAI => "https://api.openai.com/v1",
        }
    }

    /// Environment variable holding this backend's key
    pub fn key_var(&self) -> &'static str {
        match self {
            Backend::OpenRouter => "OPENROUTER_API_KEY",
            Backend::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// Where to obtain a key for this backend
    pub fn signup_url(&self) -> &'static str {
        match self {
            Backend::OpenRouter => "https://openrouter.ai/",
            Backend::OpenAI => "https://platform.openai.com/",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resolved, read-only backend configuration
#[derive(Clone)]
pub struct ProviderConfig {
    pub backend: Backend,
    pub base_url: String,
    pub model: String,
    api_key: Option<String>,
    /// Headers sent with every request in addition to `Authorization`
    pub extra_headers: Vec<(String, String)>,
    pub timeout: Duration,
}

// Hand-written so the key never ends up in logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("backend", &self.backend)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("extra_headers", &self.extra_headers)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    /// Pick a backend from the two optional credentials
    ///
    /// Empty or whitespace-only credentials count as absent.
    pub fn resolve(
        openrouter_key: Option<String>,
        openai_key: Option<String>,
        app_url: Option<String>,
        settings: &AiSettings,
    ) -> Self {
        let openrouter_key = non_empty(openrouter_key);
        let openai_key = non_empty(openai_key);

        let (backend, api_key) = match (openrouter_key, openai_key) {
            (Some(key), _) => (Backend::OpenRouter, Some(key)),
            (None, Some(key)) => (Backend::OpenAI, Some(key)),
            (None, None) => (Backend::OpenAI, None),
        };

        let model = match backend {
            Backend::OpenRouter => settings.openrouter_model.clone(),
            Backend::OpenAI => settings.openai_model.clone(),
        };

        let extra_headers = match backend {
            Backend::OpenRouter => vec![
                (
                    "HTTP-Referer".to_string(),
                    non_empty(app_url).unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
                ),
                ("X-Title".to_string(), settings.app_title.clone()),
            ],
            Backend::OpenAI => Vec::new(),
        };

        Self {
            backend,
            base_url: backend.base_url().to_string(),
            model,
            api_key,
            extra_headers,
            timeout: settings.request_timeout(),
        }
    }

    /// Read `OPENROUTER_API_KEY`, `OPENAI_API_KEY` and `APP_URL` from the environment
    pub fn from_env(settings: &AiSettings) -> Self {
        Self::resolve(
            std::env::var("OPENROUTER_API_KEY").ok(),
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("APP_URL").ok(),
            settings,
        )
    }

    /// Point the configuration at a different server (tests, self-hosted proxies)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full chat completions endpoint
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
