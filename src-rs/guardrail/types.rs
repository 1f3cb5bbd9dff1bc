use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::llm::ProviderAdapter;

/// What a guardrail reports back to the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GuardrailVerdict {
    pub guardrail: String,
    pub tripwire_triggered: bool,
    pub info: String,
}

/// A check run before the solver (on the request) or after it (on the answer).
#[async_trait]
pub trait Guardrail: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self, provider: &dyn ProviderAdapter, text: &str) -> Result<GuardrailVerdict, AgentError>;
}
