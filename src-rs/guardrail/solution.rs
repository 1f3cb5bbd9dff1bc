use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::types::{Guardrail, GuardrailVerdict};
use crate::agent::Agent;
use crate::error::AgentError;
use crate::llm::ProviderAdapter;

pub const SOLUTION_INSTRUCTIONS: &str = "Check if the response includes a valid numeric solution and steps. \
Return is_valid=true only if it does, and explain your judgment in explanation.";

/// Validator reply for the output guardrail.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SolutionCheck {
    pub is_valid: bool,
    pub explanation: String,
}

/// Output guardrail that trips when the answer lacks a numeric solution.
pub struct SolutionGuardrail {
    agent: Agent,
}

impl SolutionGuardrail {
    pub fn new() -> Self {
        Self::with_agent(Agent::new("Output Guardrail Agent", SOLUTION_INSTRUCTIONS))
    }

    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }

    pub async fn validate(&self, provider: &dyn ProviderAdapter, answer: &str) -> Result<SolutionCheck, AgentError> {
        self.agent.run_structured::<SolutionCheck>(provider, answer).await
    }
}

impl Default for SolutionGuardrail {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Guardrail for SolutionGuardrail {
    fn name(&self) -> &str {
        &self.agent.name
    }

    async fn check(&self, provider: &dyn ProviderAdapter, text: &str) -> Result<GuardrailVerdict, AgentError> {
        let check = self.validate(provider, text).await?;
        info!(guardrail = %self.agent.name, is_valid = check.is_valid, "solution validated");
        Ok(GuardrailVerdict {
            guardrail: self.agent.name.clone(),
            tripwire_triggered: !check.is_valid,
            info: check.explanation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;

    #[tokio::test]
    async fn invalid_solution_trips() {
        let provider = MockProvider::with_responses(vec![
            r#"{"is_valid": false, "explanation": "no number given"}"#.to_string(),
        ]);
        let verdict = SolutionGuardrail::new()
            .check(&provider, "Math is about patterns.")
            .await
            .unwrap();

        assert!(verdict.tripwire_triggered);
        assert_eq!(verdict.info, "no number given");
    }

    #[tokio::test]
    async fn valid_solution_passes_and_sees_the_answer() {
        let provider = MockProvider::with_responses(vec![
            r#"{"is_valid": true, "explanation": "x = 4 with steps"}"#.to_string(),
        ]);
        let answer = "2x = 8, so x = 4";
        let verdict = SolutionGuardrail::new().check(&provider, answer).await.unwrap();

        assert!(!verdict.tripwire_triggered);
        let requests = provider.requests().await;
        assert_eq!(requests[0].user_input(), Some(answer));
        assert_eq!(requests[0].system_prompt(), Some(SOLUTION_INSTRUCTIONS));
    }
}
