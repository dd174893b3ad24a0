//! Shared command utilities

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{load_expenses, ExpenseAdvisor, ExpenseRecord, Settings};
use tracing::debug;

/// Load settings from `--config`, the data-dir override, or defaults
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    Settings::load(config).with_context(|| match config {
        Some(path) => format!("Failed to load settings from {}", path.display()),
        None => "Failed to load settings".to_string(),
    })
}

/// Build the advisor from environment credentials and settings
pub fn open_advisor(config: Option<&Path>) -> Result<ExpenseAdvisor> {
    let settings = load_settings(config)?;
    let advisor = ExpenseAdvisor::from_env(&settings).context("Failed to initialize AI client")?;
    debug!(
        backend = %advisor.backend(),
        model = %advisor.config().model,
        configured = advisor.is_configured(),
        "AI backend selected"
    );
    Ok(advisor)
}

/// Read an expense file
pub fn read_expenses(path: &Path) -> Result<Vec<ExpenseRecord>> {
    load_expenses(path).with_context(|| format!("Failed to read expenses from {}", path.display()))
}
