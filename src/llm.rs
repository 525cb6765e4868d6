use std::time::Instant;
use crate::error::GatewayError;
use crate::metrics::LLM_LATENCY;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

// Thin client for an OpenAI-compatible chat completions endpoint
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    default_model: String,
}

impl LlmClient {
    pub fn new(client: reqwest::Client, base_url: String, api_key: Option<String>, default_model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            default_model,
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Sends one prompt and returns the first choice's text.
    ///
    /// No retries: an upstream failure goes straight back to the caller as
    /// `GatewayError::Upstream`.
    pub async fn complete(&self, model: &str, system: Option<&str>, prompt: &str) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::NotConfigured("LLM API key"))?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let body = ChatCompletionRequest {
            model: model.to_string(),
            messages,
        };

        let start = Instant::now();
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        LLM_LATENCY.observe(start.elapsed().as_secs_f64());

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), model, "LLM returned an error");
            return Err(GatewayError::Upstream(format!("LLM returned {}: {}", status, detail)));
        }

        let parsed: ChatCompletionResponse = res
            .json()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Parse Error: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GatewayError::Upstream("LLM returned no choices".to_string()))
    }
}
