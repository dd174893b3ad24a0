//! CLI command implementations
//!
//! Commands are organized by operation:
//! - `common` - Shared utilities (settings, advisor, expense loading)
//! - `insights` - Insight generation
//! - `categorize` - Expense categorization
//! - `ask` - Questions about spending
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command
//! - `status` - Backend status

pub mod ask;
pub mod categorize;
pub mod common;
pub mod insights;
pub mod prompts;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use ask::*;
pub use categorize::*;
pub use common::*;
pub use insights::*;
pub use prompts::*;
pub use serve::*;
pub use status::*;
