//! Insight handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::AppState;
use tally_core::models::{AIInsight, ExpenseRecord};

/// Request body for insight generation
#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

/// POST /api/insights - Generate insights for a list of expenses
///
/// Always succeeds; without a working backend the local fallback set is returned.
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InsightsRequest>,
) -> Json<Vec<AIInsight>> {
    Json(state.advisor.generate_insights(&body.expenses).await)
}
