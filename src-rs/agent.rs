use std::time::Instant;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{CompletionRequest, Message, ProviderAdapter, ResponseFormat};

/// A named set of instructions run against a provider, one model call per run.
#[derive(Clone, Debug)]
pub struct Agent {
    pub name: String,
    pub instructions: String,
}

impl Agent {
    pub fn new(name: &str, instructions: &str) -> Self {
        let resolved_name = if name.is_empty() { "agent" } else { name };
        let prompt = if instructions.is_empty() {
            "You are a helpful assistant."
        } else {
            instructions
        };
        Self {
            name: resolved_name.to_string(),
            instructions: prompt.to_string(),
        }
    }

    /// Runs the agent and returns the model's free-text reply.
    pub async fn run_text(&self, provider: &dyn ProviderAdapter, input: &str) -> Result<String, AgentError> {
        let request = self.build_request(input, None);
        self.send(provider, request).await
    }

    /// Runs the agent with `T`'s JSON schema as the required response format
    /// and decodes the reply into `T`.
    pub async fn run_structured<T>(&self, provider: &dyn ProviderAdapter, input: &str) -> Result<T, AgentError>
    where
        T: JsonSchema + DeserializeOwned,
    {
        let format = response_format_for::<T>();
        let request = self.build_request(input, Some(format));
        let content = self.send(provider, request).await?;
        decode_structured(&content).map_err(|source| AgentError::Schema {
            agent: self.name.clone(),
            source,
        })
    }

    fn build_request(&self, input: &str, response_format: Option<ResponseFormat>) -> CompletionRequest {
        CompletionRequest {
            messages: vec![Message::system(&self.instructions), Message::user(input)],
            response_format,
        }
    }

    async fn send(&self, provider: &dyn ProviderAdapter, request: CompletionRequest) -> Result<String, AgentError> {
        let started = Instant::now();
        trace!(agent = %self.name, input = ?request.user_input(), "running agent");
        let response = provider.complete(request).await?;
        debug!(
            agent = %self.name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            output_length = response.content.len(),
            "agent finished"
        );
        Ok(response.content)
    }
}

pub fn response_format_for<T: JsonSchema>() -> ResponseFormat {
    let mut schema = schemars::schema_for!(T).to_value();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }
    ResponseFormat {
        name: T::schema_name().into_owned(),
        schema,
    }
}

/// Decodes a structured reply, tolerating a surrounding markdown code fence.
pub fn decode_structured<T: DeserializeOwned>(content: &str) -> Result<T, serde_json::Error> {
    let body = strip_code_fence(content.trim());
    let value: Value = serde_json::from_str(body)?;
    serde_json::from_value(value)
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop the info string (`json`, `JSON`, ...) up to the end of the opening line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
