//! OpenAI-compatible chat-completions backend.
//!
//! Speaks the `/chat/completions` wire format shared by Groq, OpenRouter
//! and most self-hosted inference servers. One request is one HTTP call;
//! retries and timeouts belong to the application's gateway.

use super::provider::Provider;
use async_trait::async_trait;
use mad_application::{BackendError, GenerationBackend, GenerationRequest};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Where and how to reach a chat-completions endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub provider: Provider,
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl BackendSettings {
    /// Settings with the provider's default endpoint, model and key variable
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            base_url: provider.default_base_url().to_string(),
            model: provider.default_model().to_string(),
            api_key_env: provider.default_api_key_env().to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, request: &'a GenerationRequest) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the first choice's text out of a response body
fn extract_content(body: &str) -> Result<String, BackendError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        BackendError::invalid_response(format!("unreadable response body: {}", e))
    })?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| BackendError::invalid_response("response has no message content"))
}

/// `Retry-After` in whole seconds, when present
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::timeout(format!("request timed out: {}", error))
    } else if error.is_connect() {
        BackendError::network(format!("connection failed: {}", error))
    } else {
        BackendError::network(format!("request failed: {}", error))
    }
}

/// [`GenerationBackend`] over HTTP
pub struct ChatCompletionsBackend {
    client: Client,
    settings: BackendSettings,
    api_key: String,
}

impl ChatCompletionsBackend {
    pub fn new(settings: BackendSettings, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            settings,
            api_key: api_key.into(),
        }
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }
}

#[async_trait]
impl GenerationBackend for ChatCompletionsBackend {
    fn describe(&self) -> String {
        format!("{}:{}", self.settings.provider, self.settings.model)
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let body = ChatRequest::new(&self.settings.model, request);
        debug!(
            "POST {} (model={}, json_mode={})",
            self.settings.endpoint(),
            self.settings.model,
            request.json_mode
        );

        let mut http = self
            .client
            .post(self.settings.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body);
        if self.settings.provider == Provider::OpenRouter {
            http = http.header("X-Title", "legal-mad");
        }

        let response = http.send().await.map_err(transport_error)?;
        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(
                BackendError::from_status(status.as_u16(), &text).with_retry_after(retry_after),
            );
        }

        extract_content(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mad_application::BackendErrorKind;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_request_body_sets_json_mode() {
        let request = GenerationRequest::new("Decide.")
            .with_temperature(0.7)
            .with_max_tokens(1200)
            .with_json_mode(true);
        let body = serde_json::to_value(ChatRequest::new("llama-3.1-8b-instant", &request)).unwrap();

        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Decide.");
        assert_eq!(body["max_tokens"], 1200);
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_plain_request_has_no_response_format() {
        let request = GenerationRequest::new("Decide.");
        let body = serde_json::to_value(ChatRequest::new("m", &request)).unwrap();
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"decision\":\"A\"}"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), r#"{"decision":"A"}"#);

        let empty = r#"{"choices":[{"message":{"role":"assistant","content":"  "}}]}"#;
        assert_eq!(
            extract_content(empty).unwrap_err().kind,
            BackendErrorKind::InvalidResponse
        );
        assert_eq!(
            extract_content("<html>").unwrap_err().kind,
            BackendErrorKind::InvalidResponse
        );
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);
        headers.insert(reqwest::header::RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_endpoint_and_description() {
        let mut settings = BackendSettings::for_provider(Provider::Groq);
        settings.base_url = "http://localhost:8000/v1/".into();
        assert_eq!(settings.endpoint(), "http://localhost:8000/v1/chat/completions");

        let backend = ChatCompletionsBackend::new(settings, "key");
        assert_eq!(backend.describe(), "groq:llama-3.1-8b-instant");
    }
}
