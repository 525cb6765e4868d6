use axum::{Json, extract::State};
use std::sync::Arc;
use crate::error::GatewayError;
use crate::models::ImageRequest;
use crate::state::AppState;

pub async fn image_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ImageRequest>,
) -> Result<Json<serde_json::Value>, GatewayError> {
    if payload.prompt.trim().is_empty() {
        return Err(GatewayError::BadRequest("prompt must not be empty".to_string()));
    }

    let body = state.webhooks.generate_image(&payload).await?;
    Ok(Json(body))
}
