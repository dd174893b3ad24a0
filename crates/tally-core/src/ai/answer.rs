//! Free-form questions about spending

use std::collections::HashMap;

use tracing::{error, info, warn};

use crate::models::{expense_summaries_json, ExpenseRecord};
use crate::prompts::PromptId;

use super::provider::Backend;
use super::transport::CompletionError;
use super::{ExpenseAdvisor, Sampling};

const ANSWER_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 200,
};

pub const UNAVAILABLE_ANSWER: &str = "I'm unable to provide a detailed answer at the moment. Please check your API configuration or try again later.";

/// Reply when no key is configured for `backend`
pub fn unconfigured_answer(backend: Backend) -> String {
    format!(
        "AI features require an API key. Please add your {} API key ({}) to use this feature.",
        backend.display_name(),
        backend.key_var()
    )
}

/// Reply when `backend` rejected the key
pub fn auth_failed_answer(backend: Backend) -> String {
    format!(
        "Authentication failed. You need a valid {} API key. Get one from {} and set {}.",
        backend.display_name(),
        backend.signup_url(),
        backend.key_var()
    )
}

impl ExpenseAdvisor {
    /// Answer `question` using `expenses` as context
    ///
    /// Always returns text; failures become a fixed explanatory message.
    pub async fn answer(&self, question: &str, expenses: &[ExpenseRecord]) -> String {
        if !self.is_configured() {
            warn!(
                key = self.backend().key_var(),
                "No API key configured, cannot answer question"
            );
            return unconfigured_answer(self.backend());
        }

        match self.request_answer(question, expenses).await {
            Ok(answer) => {
                info!(chars = answer.len(), "Answered question");
                answer
            }
            Err(err) if err.is_auth() => {
                error!(backend = %self.backend(), error = %err, "Authentication failed answering question");
                auth_failed_answer(self.backend())
            }
            Err(err) => {
                error!(
                    backend = %self.backend(),
                    class = err.class(),
                    error = %err,
                    "Error answering question"
                );
                UNAVAILABLE_ANSWER.to_string()
            }
        }
    }

    async fn request_answer(
        &self,
        question: &str,
        expenses: &[ExpenseRecord],
    ) -> Result<String, CompletionError> {
        let expenses_json = expense_summaries_json(expenses);
        let mut vars = HashMap::new();
        vars.insert("question", question);
        vars.insert("expenses", expenses_json.as_str());

        let reply = self
            .complete(PromptId::AnswerQuestion, &vars, ANSWER_SAMPLING)
            .await?;

        let answer = reply.trim();
        if answer.is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::MockTransport;
    use super::*;

    #[tokio::test]
    async fn test_answer_trimmed() {
        let transport = MockTransport::replying("\n  Most of your money goes to Food (70.00).  \n");
        let answer = configured_advisor(&transport)
            .answer("Where does my money go?", &sample_expenses())
            .await;
        assert_eq!(answer, "Most of your money goes to Food (70.00).");
    }

    #[tokio::test]
    async fn test_unconfigured_fixed_reply() {
        let transport = MockTransport::replying("should not be used");
        let answer = unconfigured_advisor(&transport)
            .answer("How much on food?", &sample_expenses())
            .await;
        assert_eq!(
            answer,
            "AI features require an API key. Please add your OpenAI API key (OPENAI_API_KEY) to use this feature."
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_auth_failure_names_backend() {
        let transport = MockTransport::failing(CompletionError::Unauthorized("No auth credentials found".into()));
        let answer = openrouter_advisor(&transport)
            .answer("How much on food?", &sample_expenses())
            .await;
        assert_eq!(answer, auth_failed_answer(Backend::OpenRouter));
        assert!(answer.contains("OPENROUTER_API_KEY"));
        assert!(answer.contains(Backend::OpenRouter.signup_url()));
    }

    #[tokio::test]
    async fn test_other_failures_generic_reply() {
        let failures = vec![
            Err(CompletionError::Timeout),
            Err(CompletionError::Status {
                status: 503,
                body: "overloaded".into(),
            }),
            Err(CompletionError::EmptyResponse),
            Ok("   ".to_string()),
        ];
        for failure in failures {
            let transport = MockTransport::scripted(vec![failure]);
            let answer = configured_advisor(&transport)
                .answer("Anything?", &sample_expenses())
                .await;
            assert_eq!(answer, UNAVAILABLE_ANSWER);
        }
    }

    #[tokio::test]
    async fn test_request_shape() {
        let transport = MockTransport::replying("Spend less.");
        configured_advisor(&transport)
            .answer("What should I cut?", &sample_expenses())
            .await;

        let request = &transport.requests()[0];
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 200);
        assert!(request.system_content().contains("financial advisor"));

        let user = request.user_content();
        assert!(user.contains("\"What should I cut?\""));
        assert!(user.contains("\"description\": \"Groceries\""));
        assert!(user.contains("2-3 sentences"));
        assert!(!user.contains("\"id\""));
    }

    #[tokio::test]
    async fn test_empty_expenses_still_asks() {
        let transport = MockTransport::replying("You have no expenses yet.");
        let answer = configured_advisor(&transport).answer("Summary?", &[]).await;
        assert_eq!(answer, "You have no expenses yet.");
        assert!(transport.requests()[0].user_content().contains("[]"));
    }
}
