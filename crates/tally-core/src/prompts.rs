//! Prompt Library for the AI operations
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/tally/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every prompt is loaded once when the library is built; rendering afterwards
//! only reads.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const GENERATE_INSIGHTS: &str = include_str!("../prompts/generate_insights.md");
    pub const CATEGORIZE_EXPENSE: &str = include_str!("../prompts/categorize_expense.md");
    pub const ANSWER_QUESTION: &str = include_str!("../prompts/answer_question.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    GenerateInsights,
    CategorizeExpense,
    AnswerQuestion,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateInsights => "generate_insights",
            Self::CategorizeExpense => "categorize_expense",
            Self::AnswerQuestion => "answer_question",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[
            Self::GenerateInsights,
            Self::CategorizeExpense,
            Self::AnswerQuestion,
        ]
    }

    fn default_content(&self) -> &'static str {
        match self {
            Self::GenerateInsights => defaults::GENERATE_INSIGHTS,
            Self::CategorizeExpense => defaults::CATEGORIZE_EXPENSE,
            Self::AnswerQuestion => defaults::ANSWER_QUESTION,
        }
    }
}

impl std::str::FromStr for PromptId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::NotFound(format!("prompt {}", s)))
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    pub metadata: PromptMetadata,
    pub system: String,
    pub user: String,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// Parse a prompt file (frontmatter, then `# System` and `# User` sections)
    pub fn parse(content: &str) -> Result<Self> {
        let (metadata, body) = parse_frontmatter(content)?;
        let system = extract_section(&body, "# System")
            .ok_or_else(|| Error::InvalidData(format!("Prompt {} has no # System section", metadata.id)))?
            .to_string();
        let user = extract_section(&body, "# User")
            .ok_or_else(|| Error::InvalidData(format!("Prompt {} has no # User section", metadata.id)))?
            .to_string();

        Ok(Self {
            metadata,
            system,
            user,
            override_path: None,
        })
    }

    pub fn render_system(&self, vars: &HashMap<&str, &str>) -> String {
        render(&self.system, vars)
    }

    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        render(&self.user, vars)
    }
}

/// Prompt library holding every known prompt
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    prompts: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Load prompts, checking the default override directory first
    pub fn new() -> Result<Self> {
        Self::load(default_prompts_dir().as_deref())
    }

    /// Embedded defaults only
    pub fn embedded() -> Self {
        let prompts = PromptId::all()
            .iter()
            .filter_map(|&id| parse_embedded(id, id.default_content()).map(|p| (id, p)))
            .collect();
        Self { prompts }
    }

    /// Load prompts with a custom override directory
    ///
    /// A present but invalid override file is an error.
    pub fn load(override_dir: Option<&Path>) -> Result<Self> {
        let mut prompts = HashMap::new();

        for &id in PromptId::all() {
            let override_path = override_dir.map(|d| d.join(format!("{}.md", id.as_str())));

            let prompt = match override_path {
                Some(path) if path.exists() => {
                    let content = fs::read_to_string(&path).map_err(|e| {
                        Error::InvalidData(format!("Failed to read prompt override: {}", e))
                    })?;
                    let mut prompt = Prompt::parse(&content)?;
                    info!(prompt = id.as_str(), path = %path.display(), "Using prompt override");
                    prompt.override_path = Some(path);
                    prompt
                }
                _ => Prompt::parse(id.default_content())?,
            };

            prompts.insert(id, prompt);
        }

        Ok(Self { prompts })
    }

    /// Get a prompt by ID
    pub fn get(&self, id: PromptId) -> Result<&Prompt> {
        self.prompts
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("prompt {}", id.as_str())))
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("prompts").join("overrides"))
}

/// Split a prompt file into metadata and body
fn parse_frontmatter(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt body
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];

    let end = after_header.find("\n# ").unwrap_or(after_header.len());

    Some(after_header[..end].trim())
}

/// Replace `{{var}}` placeholders in one pass
///
/// Substituted values are not scanned again, so user text containing `{{...}}`
/// stays literal. Unknown placeholders are left untouched.
fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    out
}

/// Parse a compiled-in prompt, skipping it with a warning when broken
fn parse_embedded(id: PromptId, content: &str) -> Option<Prompt> {
    match Prompt::parse(content) {
        Ok(prompt) => Some(prompt),
        Err(e) => {
            warn!(prompt = id.as_str(), error = %e, "Skipping unparseable embedded prompt");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_id_from_str() {
        assert_eq!(
            "categorize_expense".parse::<PromptId>().unwrap(),
            PromptId::CategorizeExpense
        );
        for id in PromptId::all() {
            assert_eq!(id.as_str().parse::<PromptId>().unwrap(), *id);
        }
        assert!("explain_spending".parse::<PromptId>().is_err());
    }

    #[test]
    fn test_embedded_prompts_parse() {
        for &id in PromptId::all() {
            let prompt = Prompt::parse(id.default_content()).unwrap();
            assert_eq!(prompt.metadata.id, id.as_str());
            assert!(!prompt.system.is_empty());
            assert!(!prompt.user.is_empty());
        }
        assert_eq!(PromptLibrary::embedded().prompts.len(), PromptId::all().len());
    }

    #[test]
    fn test_parse_embedded_skips_broken_prompt() {
        assert!(parse_embedded(PromptId::AnswerQuestion, "no frontmatter here").is_none());
        assert!(
            parse_embedded(PromptId::AnswerQuestion, PromptId::AnswerQuestion.default_content())
                .is_some()
        );
    }

    #[test]
    fn test_parse_requires_frontmatter() {
        let result = Prompt::parse("# System\nhi\n# User\nthere");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_parse_requires_sections() {
        let result = Prompt::parse("---\nid: x\nversion: 1\n---\n# System\nonly system");
        assert!(result.is_err());
    }

    #[test]
    fn test_render_replaces_vars() {
        let mut vars = HashMap::new();
        vars.insert("name", "Food");
        assert_eq!(render("Category: {{name}}!", &vars), "Category: Food!");
        assert_eq!(render("{{ name }}", &vars), "Food");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let mut vars = HashMap::new();
        vars.insert("question", "what about {{expenses}}?");
        vars.insert("expenses", "[]");
        assert_eq!(
            render("Q: {{question}} D: {{expenses}}", &vars),
            "Q: what about {{expenses}}? D: []"
        );
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed() {
        let vars = HashMap::new();
        assert_eq!(render("a {{missing}} b", &vars), "a {{missing}} b");
        assert_eq!(render("a {{open", &vars), "a {{open");
    }

    #[test]
    fn test_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("categorize_expense.md"),
            "---\nid: categorize_expense\nversion: 2\n---\n# System\nCustom {{categories}}\n# User\nItem: {{description}}\n",
        )
        .unwrap();

        let library = PromptLibrary::load(Some(dir.path())).unwrap();
        let prompt = library.get(PromptId::CategorizeExpense).unwrap();
        assert_eq!(prompt.metadata.version, 2);
        assert!(prompt.override_path.is_some());
        assert_eq!(prompt.system, "Custom {{categories}}");

        let other = library.get(PromptId::AnswerQuestion).unwrap();
        assert!(other.override_path.is_none());
    }

    #[test]
    fn test_invalid_override_is_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("answer_question.md"), "no frontmatter").unwrap();
        assert!(PromptLibrary::load(Some(dir.path())).is_err());
    }
}
