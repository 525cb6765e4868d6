use serde::Serialize;
use crate::error::GatewayError;
use crate::models::{ImageRequest, WebhookMessage};

// Outbound calls to the notification and image-generation services
pub struct WebhookClient {
    client: reqwest::Client,
    notify_url: Option<String>,
    image_url: Option<String>,
}

impl WebhookClient {
    pub fn new(client: reqwest::Client, notify_url: Option<String>, image_url: Option<String>) -> Self {
        Self {
            client,
            notify_url,
            image_url,
        }
    }

    pub fn can_notify(&self) -> bool {
        self.notify_url.is_some()
    }

    pub async fn notify(&self, text: &str) -> Result<(), GatewayError> {
        let url = self
            .notify_url
            .as_deref()
            .ok_or(GatewayError::NotConfigured("Notification webhook"))?;

        self.post(url, &WebhookMessage { text: text.to_string() }).await?;
        Ok(())
    }

    // Returns the image service's JSON untouched
    pub async fn generate_image(&self, request: &ImageRequest) -> Result<serde_json::Value, GatewayError> {
        let url = self
            .image_url
            .as_deref()
            .ok_or(GatewayError::NotConfigured("Image webhook"))?;

        let res = self.post(url, request).await?;
        res.json()
            .await
            .map_err(|e| GatewayError::Upstream(format!("Image webhook returned invalid JSON: {}", e)))
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<reqwest::Response, GatewayError> {
        let res = self.client.post(url).json(body).send().await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Webhook call failed");
            return Err(GatewayError::Upstream(format!("Webhook returned {}", status)));
        }
        Ok(res)
    }
}
