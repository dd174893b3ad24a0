//! Locally computed insights used when the AI backend cannot be used

use crate::models::{AIInsight, ExpenseRecord, InsightKind};

use super::provider::Backend;

/// Aggregate figures behind the fallback insights
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingStats {
    pub count: usize,
    pub total: f64,
    /// `total / count`, or 0 for no expenses
    pub average: f64,
    /// Per-category totals in first-seen order
    pub category_totals: Vec<(String, f64)>,
}

impl SpendingStats {
    pub fn from_expenses(expenses: &[ExpenseRecord]) -> Self {
        let total: f64 = expenses.iter().map(|e| e.amount).sum();
        let average = if expenses.is_empty() {
            0.0
        } else {
            total / expenses.len() as f64
        };

        let mut category_totals: Vec<(String, f64)> = Vec::new();
        for expense in expenses {
            match category_totals
                .iter_mut()
                .find(|(name, _)| *name == expense.category)
            {
                Some((_, sum)) => *sum += expense.amount,
                None => category_totals.push((expense.category.clone(), expense.amount)),
            }
        }

        Self {
            count: expenses.len(),
            total,
            average,
            category_totals,
        }
    }

    /// Category with the largest total; ties go to the first seen
    pub fn top_category(&self) -> Option<(&str, f64)> {
        let mut top: Option<(&str, f64)> = None;
        for (name, sum) in &self.category_totals {
            match top {
                Some((_, best)) if *sum <= best => {}
                _ => top = Some((name.as_str(), *sum)),
            }
        }
        top
    }
}

/// Round to cents, halves away from zero
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// The two fallback insights for `expenses`
///
/// `backend` only affects which key the warning asks for.
pub fn fallback_insights(expenses: &[ExpenseRecord], backend: Backend) -> Vec<AIInsight> {
    let stats = SpendingStats::from_expenses(expenses);

    let overview = match stats.top_category() {
        Some((category, sum)) => format!(
            "Your average expense is {:.2}, with most spending in {} ({:.2}).",
            round2(stats.average),
            category,
            round2(sum)
        ),
        None => format!("Your average expense is {:.2}.", round2(stats.average)),
    };

    vec![
        AIInsight {
            id: "fallback-1".to_string(),
            kind: InsightKind::Warning,
            title: "AI Analysis Unavailable".to_string(),
            message: format!(
                "You have {} expenses totaling {:.2}. To get personalized AI insights, please configure your {} API key ({}).",
                stats.count,
                round2(stats.total),
                backend.display_name(),
                backend.key_var()
            ),
            action: Some("Configure API Key".to_string()),
            confidence: 1.0,
        },
        AIInsight {
            id: "fallback-2".to_string(),
            kind: InsightKind::Info,
            title: "Spending Overview".to_string(),
            message: overview,
            action: None,
            confidence: 1.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: f64, category: &str) -> ExpenseRecord {
        ExpenseRecord {
            id: format!("{}-{}", category, amount),
            amount,
            category: category.to_string(),
            description: String::new(),
            date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn test_stats_totals() {
        let expenses = vec![
            expense(50.0, "Food"),
            expense(20.0, "Food"),
            expense(10.0, "Transport"),
        ];
        let stats = SpendingStats::from_expenses(&expenses);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total, 80.0);
        assert!((stats.average - 80.0 / 3.0).abs() < 1e-12);
        assert_eq!(
            stats.category_totals,
            vec![("Food".to_string(), 70.0), ("Transport".to_string(), 10.0)]
        );
        assert_eq!(stats.top_category(), Some(("Food", 70.0)));
    }

    #[test]
    fn test_stats_empty() {
        let stats = SpendingStats::from_expenses(&[]);
        assert_eq!(stats.total, 0.0);
        assert_eq!(stats.average, 0.0);
        assert!(stats.top_category().is_none());
    }

    #[test]
    fn test_top_category_tie_goes_to_first() {
        let expenses = vec![
            expense(30.0, "A"),
            expense(30.0, "B"),
            expense(10.0, "C"),
        ];
        let stats = SpendingStats::from_expenses(&expenses);
        assert_eq!(stats.top_category(), Some(("A", 30.0)));
    }

    #[test]
    fn test_top_category_with_refunds() {
        let expenses = vec![expense(-40.0, "Refunds"), expense(-5.0, "Food")];
        let stats = SpendingStats::from_expenses(&expenses);
        assert_eq!(stats.top_category(), Some(("Food", -5.0)));
    }

    #[test]
    fn test_fallback_scenario() {
        let expenses = vec![
            expense(50.0, "Food"),
            expense(20.0, "Food"),
            expense(10.0, "Transport"),
        ];
        let insights = fallback_insights(&expenses, Backend::OpenAI);
        assert_eq!(insights.len(), 2);

        let warning = &insights[0];
        assert_eq!(warning.id, "fallback-1");
        assert_eq!(warning.kind, InsightKind::Warning);
        assert_eq!(warning.confidence, 1.0);
        assert!(warning.message.contains("You have 3 expenses totaling 80.00"));
        assert!(warning.message.contains("OpenAI API key (OPENAI_API_KEY)"));
        assert_eq!(warning.action.as_deref(), Some("Configure API Key"));

        let info = &insights[1];
        assert_eq!(info.id, "fallback-2");
        assert_eq!(info.kind, InsightKind::Info);
        assert_eq!(info.confidence, 1.0);
        assert_eq!(
            info.message,
            "Your average expense is 26.67, with most spending in Food (70.00)."
        );
    }

    #[test]
    fn test_fallback_empty_list() {
        let insights = fallback_insights(&[], Backend::OpenRouter);
        assert_eq!(insights.len(), 2);
        assert!(insights[0].message.contains("You have 0 expenses totaling 0.00"));
        assert!(insights[0].message.contains("OpenRouter"));
        assert_eq!(insights[1].message, "Your average expense is 0.00.");
    }

    #[test]
    fn test_fallback_rounds_halves_up() {
        let insights = fallback_insights(
            &[expense(10.25, "Food"), expense(10.0, "Bills")],
            Backend::OpenAI,
        );
        assert!(insights[0].message.contains("totaling 20.25"));
        assert_eq!(
            insights[1].message,
            "Your average expense is 10.13, with most spending in Food (10.25)."
        );

        let insights = fallback_insights(&[expense(0.125, "Food")], Backend::OpenAI);
        assert!(insights[0].message.contains("You have 1 expenses totaling 0.13"));
        assert_eq!(
            insights[1].message,
            "Your average expense is 0.13, with most spending in Food (0.13)."
        );
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(26.666), 26.67);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let expenses = vec![expense(12.345, "Bills")];
        assert_eq!(
            fallback_insights(&expenses, Backend::OpenAI),
            fallback_insights(&expenses, Backend::OpenAI)
        );
    }
}
