use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    config::GatewayConfig,
    error::{GenerationError, Result},
};

const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Thin `generateContent` transport. Owns one `reqwest::Client` for the configured timeout.
#[derive(Clone)]
pub(crate) struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: usize,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub(crate) fn new(config: &GatewayConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GenerationError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
        })
    }

    pub(crate) async fn generate_content(&self, model: &str, body: &Value) -> Result<Value> {
        let request_url = build_generate_url(&self.base_url, model);
        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            debug!(target: "wander::http", url = %request_url, attempt, "generateContent");

            let response = self
                .http
                .post(&request_url)
                .header("x-goog-api-key", self.api_key.as_str())
                .header("Content-Type", "application/json")
                .json(body)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            let headers = response.headers().clone();
            let response_text = response.text().await.map_err(transport_error)?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_duration = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < self.max_retries {
                    warn!(target: "wander::http", ?retry_after_duration, "rate limited, retrying");
                    tokio::time::sleep(retry_after_duration).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(GenerationError::RateLimit {
                    retry_after: retry_after_duration.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < self.max_retries {
                warn!(target: "wander::http", %status, "server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&response_text),
                });
            }

            let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
                GenerationError::Validation(format!("Service response is not JSON: {err}"))
            })?;

            if let Some(error) = response_json.get("error") {
                let error_message = error
                    .get("message")
                    .and_then(|value| value.as_str())
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| error.to_string());
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message: error_message,
                });
            }

            return Ok(response_json);
        }
    }
}

fn transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout(err.to_string())
    } else {
        GenerationError::Http(err.to_string())
    }
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn build_generate_url(base_url: &str, model: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    let model = model.trim_start_matches("models/");
    format!("{}/models/{}:generateContent", trimmed, model)
}

/// Body of a single-turn `generateContent` call.
#[derive(Clone, Debug)]
pub(crate) struct GenerateContentRequest {
    prompt: String,
    system_instruction: Option<String>,
    response_mime_type: Option<&'static str>,
    response_schema: Option<Value>,
}

impl GenerateContentRequest {
    pub(crate) fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: None,
            response_mime_type: None,
            response_schema: None,
        }
    }

    pub(crate) fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Constrain the reply to JSON matching `schema`.
    pub(crate) fn with_json_schema(mut self, schema: Value) -> Self {
        self.response_mime_type = Some("application/json");
        self.response_schema = Some(schema);
        self
    }

    pub(crate) fn into_value(self) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": self.prompt }]
            }]
        });

        if let Some(instruction) = self.system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(mime_type) = self.response_mime_type {
            generation_config.insert("responseMimeType".to_string(), json!(mime_type));
        }
        if let Some(schema) = self.response_schema {
            generation_config.insert("responseSchema".to_string(), schema);
        }
        if !generation_config.is_empty() {
            body["generationConfig"] = Value::Object(generation_config);
        }

        body
    }
}
