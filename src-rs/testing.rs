//! Deterministic provider for tests that must not reach a real endpoint.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::llm::{CompletionRequest, LLMResponse, ProviderAdapter, ProviderError};

/// Replies are popped from a FIFO queue, one per `complete` call.
/// Once the queue is drained every call fails with `ProviderError::EmptyResponse`.
/// Every request is recorded so tests can assert which agents ran.
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_results(Vec::new())
    }

    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(results)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// System prompts of the recorded requests, in call order.
    pub async fn called_instructions(&self) -> Vec<String> {
        self.requests
            .lock()
            .await
            .iter()
            .filter_map(|req| req.system_prompt().map(str::to_string))
            .collect()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        self.requests.lock().await.push(request);
        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or(Err(ProviderError::EmptyResponse))?;
        Ok(LLMResponse {
            content: reply,
            raw: None,
        })
    }
}
