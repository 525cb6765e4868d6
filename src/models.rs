use serde::{Deserialize, Serialize};

// POST /api/ask
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct AskRequest {
    pub prompt: String,
    #[serde(default)]
    pub system: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    // fan the answer out to the notification webhook
    #[serde(default)]
    pub notify: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct AskResponse {
    pub model: String,
    pub answer: String,
    pub cached: bool,
    pub notified: bool,
}

// POST /api/pdf?summarize=true
#[derive(Deserialize, Debug, Default)]
pub struct PdfQuery {
    #[serde(default)]
    pub summarize: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct PdfResponse {
    pub chars: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

// POST /api/image
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ImageRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

// POST /api/notify
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct NotifyRequest {
    pub message: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct NotifyResponse {
    pub delivered: bool,
}

// OpenAI-compatible chat completion wire format
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

// Body posted to chat-style notification webhooks
#[derive(Serialize, Deserialize, Debug)]
pub struct WebhookMessage {
    pub text: String,
}
