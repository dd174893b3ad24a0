//! Backend status handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Response for GET /api/status
///
/// Never includes the credential itself.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub backend: String,
    pub base_url: String,
    pub model: String,
    pub configured: bool,
}

/// GET /api/status - Report which AI backend would be used
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let provider = state.advisor.config();

    Json(StatusResponse {
        backend: provider.backend.display_name().to_string(),
        base_url: provider.base_url.clone(),
        model: provider.model.clone(),
        configured: provider.is_configured(),
    })
}
