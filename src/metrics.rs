use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("gateway_requests_total", "Total number of gated API requests").unwrap();
    pub static ref UNAUTHORIZED_TOTAL: Counter =
        register_counter!("gateway_unauthorized_total", "Requests rejected for a bad or missing API key").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("gateway_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref TRACKED_KEYS: Gauge =
        register_gauge!("gateway_rate_limit_keys", "Client keys currently tracked by the rate limiter").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("gateway_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("gateway_cache_misses_total", "Total cache misses").unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("gateway_cache_size", "Current number of items in cache").unwrap();
    pub static ref LLM_LATENCY: Histogram = register_histogram!(
        "gateway_llm_latency_seconds",
        "Upstream LLM call latency in seconds"
    )
    .unwrap();
}
