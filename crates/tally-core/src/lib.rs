//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Expense and insight models with the closed category taxonomy
//! - AI operations over an OpenAI-compatible chat API (OpenRouter or OpenAI)
//! - Locally computed fallback insights
//! - Prompt library with user overrides
//! - Settings file and expense file loading

pub mod ai;
pub mod error;
pub mod import;
pub mod models;
pub mod prompts;
pub mod settings;

/// Test utilities including a mock chat-completions server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    fallback_insights, Backend, ChatTransport, CompletionError, ExpenseAdvisor, HttpTransport,
    MockTransport, ProviderConfig,
};
pub use error::{Error, Result};
pub use import::load_expenses;
pub use models::{AIInsight, Category, ExpenseRecord, InsightKind};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use settings::{AiSettings, Settings};
