//! Known chat-completions providers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Groq,
    OpenRouter,
    /// Any OpenAI-compatible server; `base_url` must be configured
    Custom,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenRouter => "openrouter",
            Provider::Custom => "custom",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::Custom => "http://localhost:8000/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Groq => "llama-3.1-8b-instant",
            Provider::OpenRouter => "meta-llama/llama-3.3-70b-instruct:free",
            Provider::Custom => "default",
        }
    }

    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::Custom => "LEGAL_MAD_API_KEY",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            "openrouter" | "open-router" => Ok(Provider::OpenRouter),
            "custom" | "openai-compatible" => Ok(Provider::Custom),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}
