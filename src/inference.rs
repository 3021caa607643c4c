use std::time::Duration;

use crate::error::AppError;
use crate::models::{ChatMessage, InferenceRequest, InferenceResponse};

// Client for the hosted model "run" endpoint
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    api_base: String,
    account_id: String,
    api_token: String,
    model: String,
    timeout: Duration,
}

impl InferenceClient {
    pub fn new(
        http: reqwest::Client,
        api_base: &str,
        account_id: &str,
        api_token: &str,
        model: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
            model: model.to_string(),
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.api_base, self.account_id, self.model
        )
    }

    /// Sends the chat messages and returns the generated text.
    pub async fn run(&self, messages: Vec<ChatMessage>) -> Result<String, AppError> {
        let res = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_token)
            .timeout(self.timeout)
            .json(&InferenceRequest { messages })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("Inference API error: {status}")));
        }

        let body = res
            .json::<InferenceResponse>()
            .await
            .map_err(|e| AppError::Upstream(format!("Parse Error: {e}")))?;

        if !body.success {
            tracing::warn!(model = %self.model, "inference API reported success=false");
        }

        body.result
            .and_then(|r| r.response)
            .ok_or_else(|| AppError::Upstream("Unexpected AI response format".to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Role;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    // Serves `router` on an ephemeral port and returns its base URL
    pub(crate) async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    pub(crate) fn client(base: &str) -> InferenceClient {
        InferenceClient::new(
            reqwest::Client::new(),
            base,
            "acc",
            "secret",
            "@cf/test/model",
            Duration::from_secs(5),
        )
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage {
            role: Role::User,
            content: "hello".into(),
        }]
    }

    #[test]
    fn endpoint_joins_account_and_model() {
        let c = client("https://api.example.com/client/v4/");
        assert_eq!(
            c.endpoint(),
            "https://api.example.com/client/v4/accounts/acc/ai/run/@cf/test/model"
        );
    }

    #[tokio::test]
    async fn returns_generated_text() {
        let router = Router::new().route(
            "/accounts/acc/ai/run/{*model}",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer secret");
                assert_eq!(body["messages"][0]["role"], "user");
                Json(json!({ "result": { "response": "generated" }, "success": true }))
            }),
        );
        let base = spawn_upstream(router).await;

        let text = client(&base).run(messages()).await.unwrap();
        assert_eq!(text, "generated");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let router = Router::new().route(
            "/accounts/acc/ai/run/{*model}",
            post(|| async { StatusCode::UNAUTHORIZED }),
        );
        let base = spawn_upstream(router).await;

        let err = client(&base).run(messages()).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn missing_response_field_is_an_error() {
        let router = Router::new().route(
            "/accounts/acc/ai/run/{*model}",
            post(|| async { Json(json!({ "result": {}, "success": true })) }),
        );
        let base = spawn_upstream(router).await;

        let err = client(&base).run(messages()).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(msg) if msg.contains("Unexpected")));
    }
}
