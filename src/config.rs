use clap::Parser;
use std::time::Duration;

// CLI argument structure - every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "prompt-gateway")]
#[command(about = "Rate-limited gateway in front of an LLM API and a few webhooks")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Rate limit max requests per window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = 30)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // Idle key sweep interval in seconds
    #[arg(long, env = "RATE_LIMIT_SWEEP", default_value_t = 60)]
    pub sweep_interval: u64,

    // Shared secret; leave unset for open access
    #[arg(long, env = "SERVICE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "API_KEY_HEADER", default_value = "X-API-Key")]
    pub api_key_header: String,

    // OpenAI-compatible base url
    #[arg(long, env = "LLM_API_URL", default_value = "https://api.openai.com/v1")]
    pub llm_url: String,

    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_key: Option<String>,

    #[arg(short, long, env = "LLM_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    // Cache TTL in seconds (0 turns the cache off)
    #[arg(short, long, env = "CACHE_TTL", default_value_t = 30)]
    pub cache_ttl: u64,

    #[arg(long, env = "NOTIFY_WEBHOOK_URL")]
    pub notify_webhook: Option<String>,

    #[arg(long, env = "IMAGE_WEBHOOK_URL")]
    pub image_webhook: Option<String>,

    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

// What the library actually runs on; built from Args or directly in tests
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub rate_limit: u32,
    pub rate_window: Duration,
    pub sweep_interval: Duration,
    pub api_key: Option<String>,
    pub api_key_header: String,
    pub llm_url: String,
    pub llm_key: Option<String>,
    pub model: String,
    pub cache_ttl: Duration,
    pub notify_webhook: Option<String>,
    pub image_webhook: Option<String>,
    pub max_upload_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rate_limit: 30,
            rate_window: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(60),
            api_key: None,
            api_key_header: "X-API-Key".to_string(),
            llm_url: "https://api.openai.com/v1".to_string(),
            llm_key: None,
            model: "gpt-4o-mini".to_string(),
            cache_ttl: Duration::from_secs(30),
            notify_webhook: None,
            image_webhook: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

// empty strings from the environment mean "unset"
fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<Args> for GatewayConfig {
    fn from(args: Args) -> Self {
        Self {
            rate_limit: args.rate_limit,
            rate_window: Duration::from_secs(args.rate_window),
            sweep_interval: Duration::from_secs(args.sweep_interval.max(1)),
            api_key: non_empty(args.api_key),
            api_key_header: args.api_key_header,
            llm_url: args.llm_url.trim_end_matches('/').to_string(),
            llm_key: non_empty(args.llm_key),
            model: args.model,
            cache_ttl: Duration::from_secs(args.cache_ttl),
            notify_webhook: non_empty(args.notify_webhook),
            image_webhook: non_empty(args.image_webhook),
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}
