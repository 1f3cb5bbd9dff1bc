use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::types::{Guardrail, GuardrailVerdict};
use crate::agent::Agent;
use crate::error::AgentError;
use crate::llm::ProviderAdapter;

pub const HOMEWORK_INSTRUCTIONS: &str = "Determine if the user is directly asking you to *do* their math homework \
or solve an assignment for them. If the user is simply asking for an explanation or how to approach a problem, \
set is_homework_request=false. Only set is_homework_request=true if they are trying to copy a math problem for \
you to solve entirely. Explain your judgment in rationale.";

/// Classifier reply for the input guardrail.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HomeworkCheck {
    /// True only when the user wants a copied problem solved for them.
    pub is_homework_request: bool,
    pub rationale: String,
}

/// Input guardrail that trips on "do my homework" requests.
pub struct HomeworkGuardrail {
    agent: Agent,
}

impl HomeworkGuardrail {
    pub fn new() -> Self {
        Self::with_agent(Agent::new("Input Guardrail Agent", HOMEWORK_INSTRUCTIONS))
    }

    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }

    pub async fn classify(&self, provider: &dyn ProviderAdapter, input: &str) -> Result<HomeworkCheck, AgentError> {
        self.agent.run_structured::<HomeworkCheck>(provider, input).await
    }
}

impl Default for HomeworkGuardrail {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Guardrail for HomeworkGuardrail {
    fn name(&self) -> &str {
        &self.agent.name
    }

    async fn check(&self, provider: &dyn ProviderAdapter, text: &str) -> Result<GuardrailVerdict, AgentError> {
        let check = self.classify(provider, text).await?;
        info!(
            guardrail = %self.agent.name,
            is_homework_request = check.is_homework_request,
            "input classified"
        );
        Ok(GuardrailVerdict {
            guardrail: self.agent.name.clone(),
            tripwire_triggered: check.is_homework_request,
            info: check.rationale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;

    #[tokio::test]
    async fn homework_request_trips() {
        let provider = MockProvider::with_responses(vec![
            r#"{"is_homework_request": true, "rationale": "asks for the answer"}"#.to_string(),
        ]);
        let verdict = HomeworkGuardrail::new().check(&provider, "Solve: 5x - 2 = 18").await.unwrap();

        assert!(verdict.tripwire_triggered);
        assert_eq!(verdict.info, "asks for the answer");
        assert_eq!(verdict.guardrail, "Input Guardrail Agent");
    }

    #[tokio::test]
    async fn explanation_request_passes() {
        let provider = MockProvider::with_responses(vec![
            r#"{"is_homework_request": false, "rationale": "wants an explanation"}"#.to_string(),
        ]);
        let verdict = HomeworkGuardrail::new()
            .check(&provider, "how can you explain 2x + 3 = 11?")
            .await
            .unwrap();

        assert!(!verdict.tripwire_triggered);
    }

    #[tokio::test]
    async fn sends_instructions_and_schema() {
        let provider = MockProvider::with_responses(vec![
            r#"{"is_homework_request": false, "rationale": ""}"#.to_string(),
        ]);
        HomeworkGuardrail::new().check(&provider, "hi").await.unwrap();

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt(), Some(HOMEWORK_INSTRUCTIONS));
        let format = requests[0].response_format.as_ref().unwrap();
        assert_eq!(format.name, "HomeworkCheck");
    }

    #[tokio::test]
    async fn malformed_reply_is_a_schema_error() {
        let provider = MockProvider::with_responses(vec!["I think it is homework".to_string()]);
        let err = HomeworkGuardrail::new().check(&provider, "x").await.unwrap_err();
        assert!(matches!(err, AgentError::Schema { .. }));
    }
}
