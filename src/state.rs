use crate::cache::AnswerCache;
use crate::config::GatewayConfig;
use crate::llm::LlmClient;
use crate::rate_limit::RateLimiter;
use crate::webhook::WebhookClient;

// app's shared state

pub struct AppState {
    pub config: GatewayConfig,
    pub rate_limiter: RateLimiter,
    pub llm: LlmClient,
    pub webhooks: WebhookClient,
    pub cache: AnswerCache, // prompt hash -> answer
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let client = reqwest::Client::new();

        Self {
            rate_limiter: RateLimiter::new(config.rate_limit, config.rate_window),
            llm: LlmClient::new(client.clone(), config.llm_url.clone(), config.llm_key.clone(), config.model.clone()),
            webhooks: WebhookClient::new(client, config.notify_webhook.clone(), config.image_webhook.clone()),
            cache: AnswerCache::new(config.cache_ttl),
            config,
        }
    }
}
