use axum::{Json, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{AnalyticsEvent, CaptureRequest};
use crate::state::AppState;

// Forwards a client-side event to PostHog when a key is configured
pub async fn analytics_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyticsEvent>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(event) = payload.map_err(|rej| AppError::Analytics(rej.body_text()))?;

    if let Some(sink) = &state.analytics {
        let capture = CaptureRequest {
            event: event.name.as_deref(),
            properties: event.properties.as_ref(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // the capture API's status is not inspected, only transport failures count
        state
            .client
            .post(&sink.url)
            .bearer_auth(&sink.api_key)
            .json(&capture)
            .send()
            .await
            .map_err(|e| AppError::Analytics(e.to_string()))?;

        tracing::debug!(event = ?event.name, "analytics event forwarded");
    }

    Ok(Json(serde_json::json!({ "success": true })))
}
