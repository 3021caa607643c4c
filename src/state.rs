use std::sync::Arc;

use crate::inference::InferenceClient;
use crate::rate_limit::RateLimiter;

// Analytics forwarding target, only present when a key is configured
#[derive(Clone)]
pub struct AnalyticsSink {
    pub url: String,
    pub api_key: String,
}

// app's shared state
pub struct AppState {
    pub client: reqwest::Client, // shared connection pool
    pub inference: InferenceClient,
    pub analytics: Option<AnalyticsSink>,
    pub rate_limiter: Arc<RateLimiter<String>>,
}
