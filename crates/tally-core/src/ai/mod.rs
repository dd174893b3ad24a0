//! AI insight generation over an OpenAI-compatible chat completion API
//!
//! # Architecture
//!
//! - [`ProviderConfig`]: backend chosen once from the available credentials
//! - [`ChatTransport`] trait: one request in, first choice's text or a
//!   classified [`CompletionError`] out
//! - [`HttpTransport`] (reqwest) and [`MockTransport`] (tests) implement it
//! - [`ExpenseAdvisor`]: the three operations, each total
//!
//! # Usage
//!
//! ```rust,ignore
//! let settings = Settings::load(None)?;
//! let advisor = ExpenseAdvisor::from_env(&settings)?;
//!
//! let insights = advisor.generate_insights(&expenses).await;
//! let category = advisor.categorize("Uber ride to airport").await;
//! let answer = advisor.answer("Where does my money go?", &expenses).await;
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENROUTER_API_KEY`: OpenRouter key (takes priority)
//! - `OPENAI_API_KEY`: OpenAI key
//! - `APP_URL`: public URL sent to OpenRouter as `HTTP-Referer`
//!
//! With neither key set every operation answers locally.

mod answer;
mod categorizer;
pub mod fallback;
mod insights;
mod mock;
pub mod parsing;
pub mod provider;
pub mod transport;

pub use answer::{auth_failed_answer, unconfigured_answer, UNAVAILABLE_ANSWER};
pub use fallback::{fallback_insights, SpendingStats};
pub use mock::MockTransport;
pub use provider::{Backend, ProviderConfig};
pub use transport::{ChatMessage, ChatRequest, ChatTransport, CompletionError, HttpTransport};

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::prompts::{PromptId, PromptLibrary};
use crate::settings::Settings;

/// Sampling parameters for one operation
#[derive(Debug, Clone, Copy)]
struct Sampling {
    temperature: f32,
    max_tokens: u32,
}

/// Entry point for the AI operations
///
/// Cheap to share behind an `Arc`; holds no mutable state.
#[derive(Clone)]
pub struct ExpenseAdvisor {
    config: ProviderConfig,
    prompts: PromptLibrary,
    transport: Arc<dyn ChatTransport>,
}

impl ExpenseAdvisor {
    /// Create an advisor talking HTTP to the configured backend
    pub fn new(config: ProviderConfig, prompts: PromptLibrary) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, prompts, Arc::new(transport)))
    }

    /// Create an advisor with a custom transport
    pub fn with_transport(
        config: ProviderConfig,
        prompts: PromptLibrary,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            config,
            prompts,
            transport,
        }
    }

    /// Create from environment variables, settings and prompt overrides
    pub fn from_env(settings: &Settings) -> Result<Self> {
        let config = ProviderConfig::from_env(&settings.ai);
        Self::new(config, PromptLibrary::new()?)
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn backend(&self) -> Backend {
        self.config.backend
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Render a prompt into a system + user request
    fn build_request(
        &self,
        id: PromptId,
        vars: &HashMap<&str, &str>,
        sampling: Sampling,
    ) -> std::result::Result<ChatRequest, CompletionError> {
        let prompt = self
            .prompts
            .get(id)
            .map_err(|e| CompletionError::InvalidRequest(e.to_string()))?;

        Ok(ChatRequest::new(
            &self.config.model,
            &prompt.render_system(vars),
            &prompt.render_user(vars),
            sampling.temperature,
            sampling.max_tokens,
        ))
    }

    /// Build and send one request
    async fn complete(
        &self,
        id: PromptId,
        vars: &HashMap<&str, &str>,
        sampling: Sampling,
    ) -> std::result::Result<String, CompletionError> {
        let request = self.build_request(id, vars, sampling)?;
        self.transport.complete(&request).await
    }
}
