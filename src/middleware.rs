use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::rate_limit::{Decision, RateLimiter};

pub const UNKNOWN_CLIENT: &str = "unknown";

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";

#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter<String>>,
    pub trust_forwarded_for: bool,
}

/// Picks the key a request is counted under.
///
/// The forwarded header is only honoured when the gateway sits behind a proxy
/// that overwrites it, otherwise clients could pick their own key.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn set_quota_headers(headers: &mut HeaderMap, decision: &Decision) {
    headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
}

// Rate limit every route this layer wraps
pub async fn enforce_rate_limit(State(state): State<RateLimitState>, req: Request, next: Next) -> Response {
    REQUEST_TOTAL.inc();

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(req.headers(), peer, state.trust_forwarded_for);

    let decision = state.limiter.check(key.clone(), state.limiter.now_ms());

    if !decision.admitted {
        RATE_LIMITED_TOTAL.inc();
        tracing::warn!(client = %key, retry_after_ms = decision.retry_after_ms, "rate limit exceeded");

        let mut resp = (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response();
        let headers = resp.headers_mut();
        set_quota_headers(headers, &decision);
        headers.insert(
            axum::http::header::RETRY_AFTER,
            HeaderValue::from(decision.retry_after_ms.div_ceil(1000)),
        );
        return resp;
    }

    tracing::debug!(client = %key, remaining = decision.remaining, "request admitted");

    let mut resp = next.run(req).await;
    set_quota_headers(resp.headers_mut(), &decision);
    resp
}
