use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
};
use std::sync::Arc;
use crate::error::GatewayError;
use crate::models::{PdfQuery, PdfResponse};
use crate::state::AppState;

// keeps the summary prompt inside typical context limits
const SUMMARY_INPUT_CHARS: usize = 12_000;

const SUMMARY_SYSTEM_PROMPT: &str = "Summarize the following document in a few short paragraphs.";

pub async fn pdf_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PdfQuery>,
    body: Bytes,
) -> Result<Json<PdfResponse>, GatewayError> {
    if body.is_empty() {
        return Err(GatewayError::BadRequest("request body must be a PDF file".to_string()));
    }

    // pdf parsing is CPU bound, keep it off the async workers
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&body))
        .await
        .map_err(|e| {
            // the parser panics on some malformed files
            if e.is_panic() {
                GatewayError::Pdf("malformed PDF".to_string())
            } else {
                GatewayError::Internal(e.to_string())
            }
        })?
        .map_err(|e| GatewayError::Pdf(e.to_string()))?;
    let text = text.trim().to_string();

    let summary = if query.summarize && !text.is_empty() {
        let excerpt: String = text.chars().take(SUMMARY_INPUT_CHARS).collect();
        let model = state.llm.default_model().to_string();
        Some(state.llm.complete(&model, Some(SUMMARY_SYSTEM_PROMPT), &excerpt).await?)
    } else {
        None
    };

    Ok(Json(PdfResponse {
        chars: text.chars().count(),
        text,
        summary,
    }))
}
