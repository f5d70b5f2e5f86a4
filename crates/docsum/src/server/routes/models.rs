//! Model table endpoint

use axum::{extract::State, Json};

use crate::chunking::budget_for_window;
use crate::server::state::AppState;
use crate::types::{ModelInfo, ModelsResponse};

/// GET /api/models - List configured models and their derived token budgets
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let config = state.config();

    let models = config
        .models
        .models()
        .map(|(name, context_window)| ModelInfo {
            name: name.to_string(),
            context_window,
            token_budget: budget_for_window(context_window, &config.chunking),
        })
        .collect();

    Json(ModelsResponse {
        models,
        default_budget: config.chunking.default_budget,
    })
}
