//! Question answering handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use tally_core::models::ExpenseRecord;

/// Request body for a question about spending
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// POST /api/ask - Answer a free-form question about the given expenses
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    if body.question.trim().is_empty() {
        return Err(AppError::bad_request("Question is required"));
    }

    let answer = state.advisor.answer(&body.question, &body.expenses).await;
    Ok(Json(AskResponse { answer }))
}
