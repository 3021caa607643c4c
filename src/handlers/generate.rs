use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, FieldIssue};
use crate::metrics::{REQUEST_LATENCY, UPSTREAM_ERRORS};
use crate::models::{GenerateResponse, PromptForm};
use crate::prompts::build_messages;
use crate::state::AppState;

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(body) = payload
        .map_err(|rej| AppError::InvalidRequest(vec![FieldIssue::new("body", rej.body_text())]))?;
    let form = PromptForm::from_json(&body).map_err(AppError::InvalidRequest)?;
    form.validate().map_err(AppError::InvalidRequest)?;

    let start_time = Instant::now();

    let result = state.inference.run(build_messages(&form)).await;

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match result {
        Ok(generated_prompt) => {
            tracing::info!(
                category = form.category.as_str(),
                model = state.inference.model(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "prompt generated"
            );
            Ok(Json(GenerateResponse { generated_prompt }))
        }
        Err(e) => {
            UPSTREAM_ERRORS.inc();
            Err(e)
        }
    }
}
