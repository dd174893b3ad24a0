//! Insight generation

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::models::{expense_summaries_json, AIInsight, ExpenseRecord};
use crate::prompts::PromptId;

use super::fallback::fallback_insights;
use super::parsing::parse_insights;
use super::transport::CompletionError;
use super::{ExpenseAdvisor, Sampling};

const INSIGHTS_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 1000,
};

impl ExpenseAdvisor {
    /// Turn expenses into insights
    ///
    /// Never fails: without a key, or when the call or its output is unusable,
    /// the locally computed fallback set is returned.
    pub async fn generate_insights(&self, expenses: &[ExpenseRecord]) -> Vec<AIInsight> {
        if !self.is_configured() {
            warn!(
                key = self.backend().key_var(),
                "No API key configured, using local insights"
            );
            return fallback_insights(expenses, self.backend());
        }

        match self.request_insights(expenses).await {
            Ok(insights) => {
                info!(count = insights.len(), "Generated AI insights");
                insights
            }
            Err(err) => {
                error!(
                    backend = %self.backend(),
                    class = err.class(),
                    error = %err,
                    "Error generating AI insights"
                );
                if err.is_auth() {
                    error!(
                        backend = %self.backend(),
                        "Authentication failed. Your API key is invalid or you are using the wrong API endpoint"
                    );
                }
                fallback_insights(expenses, self.backend())
            }
        }
    }

    async fn request_insights(
        &self,
        expenses: &[ExpenseRecord],
    ) -> Result<Vec<AIInsight>, CompletionError> {
        let expenses_json = expense_summaries_json(expenses);
        let mut vars = HashMap::new();
        vars.insert("expenses", expenses_json.as_str());

        let response = self
            .complete(PromptId::GenerateInsights, &vars, INSIGHTS_SAMPLING)
            .await?;
        debug!("Insight response: {}", response);

        let id_prefix = format!("ai-{}", chrono::Utc::now().timestamp_millis());
        parse_insights(&response, &id_prefix)
    }
}
