//! Status command implementation

use std::path::Path;

use anyhow::Result;
use tally_core::ProviderConfig;

use super::load_settings;

pub fn cmd_status(config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config)?;
    let provider = ProviderConfig::from_env(&settings.ai);

    print!("{}", format_status(&provider));
    Ok(())
}

/// Render the status report (never includes the key itself)
pub fn format_status(provider: &ProviderConfig) -> String {
    let key_var = provider.backend.key_var();
    let credential = if provider.is_configured() {
        format!("🔑 {}=***", key_var)
    } else {
        "❌ not set (set OPENROUTER_API_KEY or OPENAI_API_KEY)".to_string()
    };

    let mut out = String::new();
    out.push('\n');
    out.push_str("📊 Tally Status\n");
    out.push_str("   ─────────────────────────────────────────────────────────────\n");
    out.push_str(&format!("   Backend: {}\n", provider.backend.display_name()));
    out.push_str(&format!("   Endpoint: {}\n", provider.completions_url()));
    out.push_str(&format!("   Model: {}\n", provider.model));
    out.push_str(&format!("   Timeout: {}s\n", provider.timeout.as_secs()));
    out.push_str(&format!("   Credential: {}\n", credential));
    if !provider.is_configured() {
        out.push_str("\n   AI features are disabled; insights use local statistics.\n");
    }
    out
}
