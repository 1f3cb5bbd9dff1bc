use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// JSON schema the model reply must conform to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseFormat {
    pub name: String,
    pub schema: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub raw: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    /// Instructions of the agent that issued this request, if any.
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|msg| msg.role == "system")
            .map(|msg| msg.content.as_str())
    }

    pub fn user_input(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|msg| msg.role == "user")
            .map(|msg| msg.content.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimit(String),

    #[error("server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("api error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("provider returned no message content")]
    EmptyResponse,

    #[error("no API key configured")]
    NoApiKey,
}

impl ProviderError {
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::Network(_) => "network_error",
            ProviderError::Auth(_) => "auth_error",
            ProviderError::RateLimit(_) => "rate_limit",
            ProviderError::Server { .. } => "server_error",
            ProviderError::Api { .. } => "api_error",
            ProviderError::Parse(_) => "parse_error",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::NoApiKey => "auth_error",
        }
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError>;
}
