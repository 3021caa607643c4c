use std::hash::Hash;
use std::sync::Arc;
use tokio::time::{Duration, interval};

use crate::metrics::TRACKED_CLIENTS;
use crate::rate_limit::RateLimiter;

// Eviction loop - drops expired windows so the registry stays bounded
pub async fn eviction_sweeper<K: Eq + Hash>(limiter: Arc<RateLimiter<K>>, sweep_interval: Duration) {
    let mut interval = interval(sweep_interval);

    tracing::info!(interval = ?sweep_interval, "rate limit sweeper started");

    loop {
        interval.tick().await;
        sweep_once(&limiter);
    }
}

pub fn sweep_once<K: Eq + Hash>(limiter: &RateLimiter<K>) -> usize {
    let removed = limiter.sweep(limiter.now_ms());
    TRACKED_CLIENTS.set(limiter.len() as f64);

    if removed > 0 {
        tracing::debug!(removed, remaining = limiter.len(), "evicted expired rate limit entries");
    }
    removed
}
