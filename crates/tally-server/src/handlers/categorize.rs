//! Categorization handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;
use tally_core::models::Category;

/// Request body for categorization
#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    pub category: Category,
}

/// POST /api/categorize - Suggest a category for an expense description
pub async fn categorize_expense(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CategorizeRequest>,
) -> Json<CategorizeResponse> {
    let category = state.advisor.categorize(&body.description).await;
    Json(CategorizeResponse { category })
}
