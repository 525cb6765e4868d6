use axum::{Json, extract::State};
use std::sync::Arc;
use crate::error::GatewayError;
use crate::models::{NotifyRequest, NotifyResponse};
use crate::state::AppState;

pub async fn notify_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>, GatewayError> {
    if payload.message.trim().is_empty() {
        return Err(GatewayError::BadRequest("message must not be empty".to_string()));
    }

    state.webhooks.notify(&payload.message).await?;
    Ok(Json(NotifyResponse { delivered: true }))
}
