//! Generation Gateway
//!
//! The only place that talks to a [`GenerationBackend`]. Every call gets the
//! same policy: a per-request timeout, bounded retries with exponential
//! backoff for transient failures, and immediate propagation of everything
//! else. JSON calls additionally clean and parse the response.

use crate::config::GatewayConfig;
use crate::ports::generation_backend::{
    BackendError, BackendErrorKind, GenerationBackend, GenerationRequest,
};
use mad_domain::{ParseError, parse_json_payload};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Terminal failure of one logical generation call
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("Generation failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: BackendError,
    },

    #[error("Generation rejected: {0}")]
    Rejected(#[source] BackendError),
}

impl GenerationError {
    pub fn backend_error(&self) -> &BackendError {
        match self {
            GenerationError::RetriesExhausted { source, .. } => source,
            GenerationError::Rejected(source) => source,
        }
    }
}

/// Failure of a JSON generation call
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A parsed JSON response and the text it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub value: Value,
    pub raw: String,
}

/// Retrying wrapper around a generation backend
pub struct GenerationGateway<B: GenerationBackend + 'static> {
    backend: Arc<B>,
    config: GatewayConfig,
}

impl<B: GenerationBackend + 'static> GenerationGateway<B> {
    pub fn new(backend: Arc<B>, config: GatewayConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate free text.
    ///
    /// Makes at most [`GatewayConfig::attempts`] backend calls.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let attempts = self.config.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                "Generation attempt {}/{} on {} (json_mode={}, max_tokens={})",
                attempt,
                attempts,
                self.backend.describe(),
                request.json_mode,
                request.max_tokens
            );

            let error = match self.call_once(request).await {
                Ok(text) => return Ok(text),
                Err(e) => e,
            };

            if !error.is_transient() {
                return Err(GenerationError::Rejected(error));
            }
            if attempt >= attempts {
                warn!("Giving up after {} attempts: {}", attempts, error);
                return Err(GenerationError::RetriesExhausted {
                    attempts,
                    source: error,
                });
            }

            let mut delay = self.config.backoff_delay(attempt - 1);
            if let Some(hint) = error.retry_after {
                delay = delay.max(hint).min(self.config.max_delay);
            }
            warn!(
                "Transient backend error ({}), retrying in {:?} [{}/{}]",
                error, delay, attempt, attempts
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Generate a JSON object.
    ///
    /// Asks the backend for native JSON mode, then strips code fences and
    /// parses. When native JSON mode is rejected, or its output does not
    /// parse, the call is repeated once in plain-text mode. Unparseable text
    /// is a [`ParseError`] carrying the raw response.
    pub async fn generate_json(&self, request: &GenerationRequest) -> Result<Value, GatewayError> {
        Ok(self.generate_json_reply(request).await?.value)
    }

    /// Like [`generate_json`](Self::generate_json), keeping the text the
    /// parsed value came from.
    pub async fn generate_json_reply(
        &self,
        request: &GenerationRequest,
    ) -> Result<JsonReply, GatewayError> {
        let json_request = request.clone().with_json_mode(true);

        let first_error = match self.generate(&json_request).await {
            Ok(text) => match parse_json_payload(&text) {
                Ok(value) => return Ok(JsonReply { value, raw: text }),
                Err(e) => GatewayError::Parse(e),
            },
            Err(GenerationError::Rejected(e)) if e.kind == BackendErrorKind::JsonModeUnsupported => {
                GatewayError::Generation(GenerationError::Rejected(e))
            }
            Err(e) => return Err(e.into()),
        };

        if !self.config.json_fallback {
            return Err(first_error);
        }

        warn!("JSON mode failed ({}), retrying once in plain-text mode", first_error);
        let plain_request = request.clone().with_json_mode(false);
        let text = self.generate(&plain_request).await?;
        let value = parse_json_payload(&text)?;
        Ok(JsonReply { value, raw: text })
    }

    async fn call_once(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        match tokio::time::timeout(self.config.request_timeout, self.backend.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::timeout(format!(
                "no response within {:?}",
                self.config.request_timeout
            ))),
        }
    }
}
