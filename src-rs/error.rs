use thiserror::Error;

use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key found, set API_KEY")]
    MissingApiKey,

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The model reply did not match the agent's output schema.
    #[error("agent {agent} returned output that does not match its schema: {source}")]
    Schema {
        agent: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("request must not be empty")]
    EmptyRequest,

    #[error(transparent)]
    Agent(#[from] AgentError),
}
