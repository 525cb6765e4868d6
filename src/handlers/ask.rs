use axum::{Json, extract::State};
use std::sync::Arc;
use crate::cache::make_cache_key;
use crate::error::GatewayError;
use crate::models::{AskRequest, AskResponse};
use crate::state::AppState;

//post handler
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, GatewayError> {
    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return Err(GatewayError::BadRequest("prompt must not be empty".to_string()));
    }

    let model = payload
        .model
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or(state.llm.default_model())
        .to_string();
    let system = payload.system.as_deref().filter(|s| !s.trim().is_empty());

    // check cache first
    let cache_key = make_cache_key(&model, system, prompt);
    let (answer, cached) = match state.cache.get(&cache_key) {
        Some(answer) => {
            tracing::debug!(model = %model, "Cache HIT");
            (answer, true)
        }
        None => {
            let answer = state.llm.complete(&model, system, prompt).await?;
            state.cache.insert(cache_key, answer.clone());
            (answer, false)
        }
    };

    // fan-out is best effort; the answer is already in hand
    let notified = if payload.notify && state.webhooks.can_notify() {
        match state.webhooks.notify(&answer).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Notification fan-out failed");
                false
            }
        }
    } else {
        false
    };

    Ok(Json(AskResponse {
        model,
        answer,
        cached,
        notified,
    }))
}
