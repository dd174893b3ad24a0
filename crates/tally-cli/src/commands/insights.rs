//! Insight command implementation

use std::path::Path;

use anyhow::Result;
use tally_core::models::{AIInsight, InsightKind};

use super::{open_advisor, read_expenses};

pub async fn cmd_insights(config: Option<&Path>, file: &Path, json: bool) -> Result<()> {
    let expenses = read_expenses(file)?;
    let advisor = open_advisor(config)?;

    let insights = advisor.generate_insights(&expenses).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!();
    println!("💡 Insights for {} expenses", expenses.len());
    println!("   ─────────────────────────────────────────────────────────────");
    if insights.is_empty() {
        println!("   No insights returned.");
    }
    for insight in &insights {
        print!("{}", format_insight(insight));
    }
    println!();

    Ok(())
}

fn icon(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::Warning => "⚠️ ",
        InsightKind::Info => "ℹ️ ",
        InsightKind::Success => "✅",
        InsightKind::Tip => "💡",
    }
}

/// Render one insight as an indented block
pub fn format_insight(insight: &AIInsight) -> String {
    let mut out = format!(
        "\n   {} {} ({:.0}%)\n      {}\n",
        icon(insight.kind),
        insight.title,
        insight.confidence * 100.0,
        insight.message
    );
    if let Some(ref action) = insight.action {
        out.push_str(&format!("      → {}\n", action));
    }
    out
}
