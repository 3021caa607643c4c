mod config;
mod error;
mod handlers;
mod inference;
mod metrics;
mod middleware;
mod models;
mod prompts;
mod rate_limit;
mod state;
mod sweeper;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Args, LogFormat};
use crate::handlers::{analytics_handler, generate_handler, health_handler, metrics_handler};
use crate::inference::InferenceClient;
use crate::middleware::{RateLimitState, enforce_rate_limit};
use crate::rate_limit::{Policy, RateLimiter};
use crate::state::{AnalyticsSink, AppState};
use crate::sweeper::eviction_sweeper;

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,prompt_gateway=debug"));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

// Everything under /api shares one per-client quota
fn build_router(state: Arc<AppState>, trust_forwarded_for: bool) -> Router {
    let limits = RateLimitState {
        limiter: Arc::clone(&state.rate_limiter),
        trust_forwarded_for,
    };

    Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/analytics", post(analytics_handler))
        .route_layer(from_fn_with_state(limits, enforce_rate_limit))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let rate_limiter = Arc::new(RateLimiter::new(Policy::new(
        args.rate_window_ms,
        args.rate_limit,
    )?));
    let policy = rate_limiter.policy();

    let client = reqwest::Client::new();
    let inference = InferenceClient::new(
        client.clone(),
        &args.api_base,
        &args.account_id,
        &args.api_token,
        &args.model,
        Duration::from_secs(args.upstream_timeout_secs),
    );
    let analytics = args.posthog_api_key.clone().map(|api_key| AnalyticsSink {
        url: args.posthog_url.clone(),
        api_key,
    });

    let state = Arc::new(AppState {
        client,
        inference,
        analytics,
        rate_limiter: Arc::clone(&rate_limiter),
    });

    // spawn the eviction sweeper
    tokio::spawn(eviction_sweeper(
        rate_limiter,
        Duration::from_secs(args.sweep_interval_secs.max(1)),
    ));

    let app = build_router(state, args.trust_forwarded_for);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "gateway listening");
    tracing::info!(model = %args.model, "forwarding prompts to inference API");
    tracing::info!(
        max_requests = policy.max_requests(),
        window_ms = policy.window_ms(),
        "rate limit configured"
    );
    if args.posthog_api_key.is_some() {
        tracing::info!("analytics forwarding enabled");
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
