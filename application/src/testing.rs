//! Test doubles shared by the application unit tests.

use crate::config::GatewayConfig;
use crate::ports::generation_backend::{BackendError, GenerationBackend, GenerationRequest};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

type Reply = Result<String, BackendError>;

/// Gateway config with millisecond backoff so retry tests run fast
pub fn fast_gateway_config() -> GatewayConfig {
    GatewayConfig::default()
        .with_base_delay(Duration::from_millis(1))
        .with_max_delay(Duration::from_millis(5))
        .with_request_timeout(Duration::from_secs(5))
}

/// Backend that replays a fixed script of replies and records every request
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    repeat: Option<Reply>,
    delay: Option<Duration>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            repeat: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn texts<const N: usize>(texts: [&str; N]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    /// Reply with the same result forever
    pub fn always(reply: Reply) -> Self {
        Self {
            repeat: Some(reply),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        match (next, &self.repeat) {
            (Some(reply), _) => reply,
            (None, Some(reply)) => reply.clone(),
            (None, None) => Err(BackendError::invalid_response("script exhausted")),
        }
    }
}

/// Backend that answers each request by inspecting its prompt
pub struct PromptRouter {
    route: Box<dyn Fn(&str) -> Reply + Send + Sync>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl PromptRouter {
    pub fn new(route: impl Fn(&str) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            route: Box::new(route),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompts_containing(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.prompt.contains(needle))
            .count()
    }
}

#[async_trait]
impl GenerationBackend for PromptRouter {
    fn describe(&self) -> String {
        "router".to_string()
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.route)(&request.prompt)
    }
}

/// Letter named by an assigned-position opening prompt
pub fn assigned_letter(prompt: &str) -> Option<String> {
    let rest = prompt.split("Argue that choice ").nth(1)?;
    rest.chars().next().map(|c| c.to_string())
}

pub fn irac_json(conclusion: &str) -> serde_json::Value {
    serde_json::json!({
        "issue": "Whether the agreement binds the parties",
        "rule": "Offer and acceptance must coincide",
        "application": "The reply mirrored the offer",
        "conclusion": conclusion
    })
}
