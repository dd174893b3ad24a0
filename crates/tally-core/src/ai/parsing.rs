//! Parsing helpers for model output
//!
//! Models may wrap JSON in a fenced code block. The helpers here strip one
//! fence and turn the payload into insights or a category. A payload that does
//! not have the expected shape is rejected as a whole.

use serde_json::{Map, Value};

use crate::models::{AIInsight, Category, InsightKind};

use super::transport::CompletionError;

pub const DEFAULT_INSIGHT_TITLE: &str = "AI Insight";
pub const DEFAULT_INSIGHT_MESSAGE: &str = "Analysis complete";
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Remove a single surrounding ``` fence, labelled (```json) or not
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(after_open) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Optional language label directly after the opening marker
    let label_len = after_open
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_open.len());
    let body = after_open[label_len..].trim_start();

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim_end()
}

/// Parse a model payload into insights
///
/// `id_prefix` is combined with each element's position to form identifiers.
pub fn parse_insights(response: &str, id_prefix: &str) -> Result<Vec<AIInsight>, CompletionError> {
    let cleaned = strip_code_fence(response);
    if cleaned.is_empty() {
        return Err(CompletionError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        CompletionError::Malformed(format!("Invalid JSON from AI: {} | Raw: {}", e, preview(cleaned)))
    })?;

    let Value::Array(items) = value else {
        return Err(CompletionError::Malformed(format!(
            "Expected a JSON array of insights | Raw: {}",
            preview(cleaned)
        )));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(obj) => Ok(insight_from_object(obj, format!("{}-{}", id_prefix, index))),
            other => Err(CompletionError::Malformed(format!(
                "Insight {} is not an object: {}",
                index,
                preview(&other.to_string())
            ))),
        })
        .collect()
}

/// Build an insight, defaulting missing or mistyped fields
fn insight_from_object(obj: &Map<String, Value>, id: String) -> AIInsight {
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let kind = text("type")
        .and_then(|t| t.parse::<InsightKind>().ok())
        .unwrap_or_default();

    let confidence = obj
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_CONFIDENCE);

    AIInsight {
        id,
        kind,
        title: text("title").unwrap_or_else(|| DEFAULT_INSIGHT_TITLE.to_string()),
        message: text("message").unwrap_or_else(|| DEFAULT_INSIGHT_MESSAGE.to_string()),
        action: obj
            .get("action")
            .and_then(Value::as_str)
            .map(str::to_string),
        confidence,
    }
}

/// Resolve a categorization reply to a category
pub fn parse_category(response: &str) -> Category {
    Category::from_label(response.trim())
}

fn preview(s: &str) -> String {
    if s.chars().count() > 200 {
        let cut: String = s.chars().take(200).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
