//! Expense categorization

use std::collections::HashMap;

use tracing::{debug, error, info, warn};

use crate::models::Category;
use crate::prompts::PromptId;

use super::parsing::parse_category;
use super::{ExpenseAdvisor, Sampling};

const CATEGORIZE_SAMPLING: Sampling = Sampling {
    temperature: 0.1,
    max_tokens: 20,
};

impl ExpenseAdvisor {
    /// Pick a category for a free-text description
    ///
    /// Anything other than an exact category label in the reply, and every
    /// failure, resolves to [`Category::Other`].
    pub async fn categorize(&self, description: &str) -> Category {
        if !self.is_configured() {
            warn!(
                key = self.backend().key_var(),
                "No API key configured, skipping categorization"
            );
            return Category::Other;
        }

        if description.trim().is_empty() {
            debug!("Empty description, categorized as Other");
            return Category::Other;
        }

        let categories = Category::label_list();
        let mut vars = HashMap::new();
        vars.insert("categories", categories.as_str());
        vars.insert("description", description);

        match self
            .complete(PromptId::CategorizeExpense, &vars, CATEGORIZE_SAMPLING)
            .await
        {
            Ok(reply) => {
                let category = parse_category(&reply);
                info!(
                    description = description,
                    reply = reply.trim(),
                    category = %category,
                    "Categorized expense"
                );
                category
            }
            Err(err) => {
                error!(
                    backend = %self.backend(),
                    class = err.class(),
                    error = %err,
                    "Error categorizing expense"
                );
                if err.is_auth() {
                    error!(
                        "Authentication failed. Make sure {} matches {} ({})",
                        self.backend().key_var(),
                        self.config.base_url,
                        self.backend().signup_url()
                    );
                }
                Category::Other
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{CompletionError, MockTransport};
    use super::*;

    #[tokio::test]
    async fn test_exact_label() {
        let transport = MockTransport::replying("Transportation");
        let category = configured_advisor(&transport)
            .categorize("Uber ride to airport")
            .await;
        assert_eq!(category, Category::Transportation);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_label_with_whitespace() {
        let transport = MockTransport::replying("  Food\n");
        let category = configured_advisor(&transport).categorize("Coffee").await;
        assert_eq!(category, Category::Food);
    }

    #[tokio::test]
    async fn test_unknown_label_is_other() {
        for reply in ["Taxi", "food", "Category: Food", "Food."] {
            let transport = MockTransport::replying(reply);
            let category = configured_advisor(&transport).categorize("Ride").await;
            assert_eq!(category, Category::Other, "reply {:?}", reply);
        }
    }

    #[tokio::test]
    async fn test_failure_is_other() {
        let transport = MockTransport::failing(CompletionError::Unauthorized("invalid key".into()));
        let category = openrouter_advisor(&transport).categorize("Vet visit").await;
        assert_eq!(category, Category::Other);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_makes_no_call() {
        let transport = MockTransport::replying("Food");
        let category = unconfigured_advisor(&transport).categorize("Pizza").await;
        assert_eq!(category, Category::Other);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_description_makes_no_call() {
        let transport = MockTransport::replying("Food");
        let advisor = configured_advisor(&transport);
        assert_eq!(advisor.categorize("").await, Category::Other);
        assert_eq!(advisor.categorize("   ").await, Category::Other);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let transport = MockTransport::replying("Dog");
        configured_advisor(&transport).categorize("Dog food").await;

        let request = &transport.requests()[0];
        assert!((request.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 20);
        assert!(request.system_content().contains(
            "Food, Transportation, Entertainment, Shopping, Bills, Healthcare, Dog, Other"
        ));
        assert_eq!(request.user_content(), "Categorize this expense: \"Dog food\"");
    }

    #[tokio::test]
    async fn test_description_is_not_reinterpreted() {
        let transport = MockTransport::replying("Other");
        configured_advisor(&transport)
            .categorize("{{categories}} refund")
            .await;
        assert_eq!(
            transport.requests()[0].user_content(),
            "Categorize this expense: \"{{categories}} refund\""
        );
    }
}
