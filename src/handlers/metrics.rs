use axum::extract::State;
use std::sync::Arc;

use crate::error::AppError;
use crate::metrics::{TRACKED_CLIENTS, render};
use crate::state::AppState;

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Result<String, AppError> {
    TRACKED_CLIENTS.set(state.rate_limiter.len() as f64);
    render()
}
