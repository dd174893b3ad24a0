//! Data models for Tally

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single expense as seen by the AI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Opaque identifier assigned by the persistence layer
    pub id: String,
    /// Signed amount, currency-agnostic
    pub amount: f64,
    /// Free-form category as stored by the caller
    pub category: String,
    pub description: String,
    /// Date token, passed through verbatim
    pub date: String,
}

impl ExpenseRecord {
    /// Projection sent to the LLM (no identifier)
    pub fn summary(&self) -> ExpenseSummary<'_> {
        ExpenseSummary {
            amount: self.amount,
            category: &self.category,
            description: &self.description,
            date: &self.date,
        }
    }
}

/// Stripped view of an expense embedded in prompts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpenseSummary<'a> {
    pub amount: f64,
    pub category: &'a str,
    pub description: &'a str,
    pub date: &'a str,
}

/// Serialize the stripped projection of `expenses` as pretty JSON
pub fn expense_summaries_json(expenses: &[ExpenseRecord]) -> String {
    let summaries: Vec<ExpenseSummary<'_>> = expenses.iter().map(ExpenseRecord::summary).collect();
    // Strings and numbers only; serde_json writes non-finite amounts as null
    serde_json::to_string_pretty(&summaries).unwrap_or_else(|_| "[]".to_string())
}

/// Kind of AI insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    #[default]
    Info,
    Success,
    Tip,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Warning => "warning",
            InsightKind::Info => "info",
            InsightKind::Success => "success",
            InsightKind::Tip => "tip",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(InsightKind::Warning),
            "info" => Ok(InsightKind::Info),
            "success" => Ok(InsightKind::Success),
            "tip" => Ok(InsightKind::Tip),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// One derived observation about spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIInsight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

/// Closed set of expense categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Shopping,
    Bills,
    Healthcare,
    Dog,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Healthcare => "Healthcare",
            Category::Dog => "Dog",
            Category::Other => "Other",
        }
    }

    /// All categories, in display order
    pub fn all() -> &'static [Category] {
        &[
            Category::Food,
            Category::Transportation,
            Category::Entertainment,
            Category::Shopping,
            Category::Bills,
            Category::Healthcare,
            Category::Dog,
            Category::Other,
        ]
    }

    /// Comma-separated label list for prompts
    pub fn label_list() -> String {
        Self::all()
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve model output to a category (exact match, otherwise `Other`)
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Case-sensitive: `"food"` is not a category
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}
