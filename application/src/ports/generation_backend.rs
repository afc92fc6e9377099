//! Generation backend port
//!
//! Defines the single call contract between the application layer and a
//! remote text-generation service.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// One text-generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the backend for a syntactically valid JSON object
    pub json_mode: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.0,
            max_tokens: 1000,
            json_mode: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }

    /// Same request with a different prompt
    pub fn with_prompt(&self, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..self.clone()
        }
    }
}

/// Classification of a backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// HTTP 429 or a provider-specific quota signal
    RateLimited,
    /// HTTP 5xx
    Server,
    /// Connection failure before a response arrived
    Network,
    /// No response within the request timeout
    Timeout,
    /// The backend rejected native JSON-object mode
    JsonModeUnsupported,
    /// Other 4xx: bad request, auth, unknown model
    Client,
    /// A response arrived but had no usable text
    InvalidResponse,
}

impl BackendErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendErrorKind::RateLimited => "rate_limited",
            BackendErrorKind::Server => "server",
            BackendErrorKind::Network => "network",
            BackendErrorKind::Timeout => "timeout",
            BackendErrorKind::JsonModeUnsupported => "json_mode_unsupported",
            BackendErrorKind::Client => "client",
            BackendErrorKind::InvalidResponse => "invalid_response",
        }
    }
}

impl std::fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned by a [`GenerationBackend`]
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} ({}): {message}", .status.map(|s| s.to_string()).unwrap_or_else(|| "no status".to_string()))]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub status: Option<u16>,
    pub message: String,
    /// Server-provided wait hint (`Retry-After`)
    pub retry_after: Option<Duration>,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after = retry_after;
        self
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::RateLimited, message).with_status(429)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Timeout, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::InvalidResponse, message)
    }

    /// Classify an HTTP error response.
    ///
    /// 429 is a rate limit, 5xx a server fault, a 400 whose body reports a
    /// JSON validation failure means native JSON mode was rejected, and any
    /// other status is a client error.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            429 => BackendErrorKind::RateLimited,
            500..=599 => BackendErrorKind::Server,
            400 if mentions_json_validation(body) => BackendErrorKind::JsonModeUnsupported,
            _ => BackendErrorKind::Client,
        };
        Self::new(kind, body.trim()).with_status(status)
    }

    /// Whether the same call may succeed if repeated later
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            BackendErrorKind::RateLimited
                | BackendErrorKind::Server
                | BackendErrorKind::Network
                | BackendErrorKind::Timeout
        )
    }
}

fn mentions_json_validation(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("json_validate_failed")
        || lower.contains("response_format")
        || lower.contains("json mode")
}

/// Remote text generation
///
/// Implementations (adapters) live in the infrastructure layer. They make
/// exactly one remote call per invocation and leave retrying to the
/// application's gateway.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Identifier used in logs (provider and model)
    fn describe(&self) -> String;

    /// Run one completion and return the generated text
    async fn complete(&self, request: &GenerationRequest) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            BackendError::from_status(429, "slow down").kind,
            BackendErrorKind::RateLimited
        );
        assert_eq!(BackendError::from_status(503, "").kind, BackendErrorKind::Server);
        assert_eq!(
            BackendError::from_status(400, r#"{"error":{"code":"json_validate_failed"}}"#).kind,
            BackendErrorKind::JsonModeUnsupported
        );
        assert_eq!(
            BackendError::from_status(401, "bad key").kind,
            BackendErrorKind::Client
        );
    }

    #[test]
    fn test_transient_kinds() {
        assert!(BackendError::rate_limited("x").is_transient());
        assert!(BackendError::from_status(502, "").is_transient());
        assert!(BackendError::network("reset").is_transient());
        assert!(BackendError::timeout("slow").is_transient());
        assert!(!BackendError::from_status(400, "bad").is_transient());
        assert!(!BackendError::invalid_response("empty").is_transient());
    }

    #[test]
    fn test_display_includes_status() {
        let error = BackendError::from_status(503, "overloaded");
        assert_eq!(error.to_string(), "server (503): overloaded");
        assert_eq!(
            BackendError::network("reset").to_string(),
            "network (no status): reset"
        );
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("p")
            .with_temperature(0.7)
            .with_max_tokens(1200)
            .with_json_mode(true);
        let copy = request.with_prompt("q");
        assert_eq!(copy.prompt, "q");
        assert_eq!(copy.max_tokens, 1200);
        assert!(copy.json_mode);
    }
}
