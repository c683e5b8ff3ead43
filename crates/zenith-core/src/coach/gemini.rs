//! Gemini `generateContent` client.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use url::Url;

use super::{ChatModel, Message, Role};
use crate::error::CoachError;
use crate::storage::CoachConfig;

const NOT_FOUND_MARKER: &str = "Requested entity was not found";

pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    system_instruction: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns `CoachError::Endpoint` if `base_url` and `model` do not form a
    /// valid URL.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Result<Self, CoachError> {
        let endpoint = Url::parse(&format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        ))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key: api_key.into(),
            system_instruction: system_instruction.into(),
        })
    }

    pub fn from_config(config: &CoachConfig, api_key: impl Into<String>) -> Result<Self, CoachError> {
        Self::new(
            &config.base_url,
            &config.model,
            api_key,
            config.system_instruction.clone(),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_body(&self, history: &[Message]) -> Value {
        let contents: Vec<Value> = history
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Model => "model",
                };
                json!({ "role": role, "parts": [{ "text": m.text }] })
            })
            .collect();
        json!({
            "systemInstruction": { "parts": [{ "text": self.system_instruction }] },
            "contents": contents,
        })
    }
}

impl ChatModel for GeminiClient {
    async fn reply(&self, history: &[Message]) -> Result<String, CoachError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&self.request_body(history))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "coach request rejected");
            return Err(classify_failure(status, &body));
        }

        let body: Value = resp.json().await?;
        extract_text(&body)
    }
}

fn classify_failure(status: StatusCode, body: &str) -> CoachError {
    let expired = matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    ) || body.contains(NOT_FOUND_MARKER);
    if expired {
        CoachError::AuthorizationExpired
    } else {
        CoachError::Http {
            status: status.as_u16(),
        }
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &Value) -> Result<String, CoachError> {
    let candidate = body
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .ok_or_else(|| CoachError::MalformedResponse("no candidates".into()))?;

    let text = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}
