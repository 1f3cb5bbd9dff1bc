use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, trace};

use super::rotation::Rotator;
use super::types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError, ResponseFormat};
use crate::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::error::ConfigError;

pub struct OpenAIConfig {
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub timeout: Duration,
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct OpenAIAdapter {
    cfg: OpenAIConfig,
    rotator: Rotator,
    client: Client,
}

impl OpenAIAdapter {
    pub fn new(mut cfg: OpenAIConfig) -> Result<Self, ConfigError> {
        if cfg.base_url.is_empty() {
            cfg.base_url = DEFAULT_BASE_URL.to_string();
        }
        if cfg.model.is_empty() {
            cfg.model = DEFAULT_MODEL.to_string();
        }
        if cfg.api_keys.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|err| ConfigError::Client(err.to_string()))?;
        Ok(Self {
            rotator: Rotator::new(cfg.api_keys.clone()),
            cfg,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.cfg.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIAdapter {
    async fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        let payload = build_payload(
            &self.cfg.model,
            &request.messages,
            request.response_format.as_ref(),
            self.cfg.temperature,
        );
        let key = self.rotator.next().ok_or(ProviderError::NoApiKey)?;
        trace!(payload = %payload, "chat completion payload");
        send_request(&self.client, &self.endpoint(), key, &payload).await
    }
}

fn build_payload(
    model: &str,
    messages: &[Message],
    response_format: Option<&ResponseFormat>,
    temperature: Option<f64>,
) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|msg| json!({"role": msg.role, "content": msg.content}))
        .collect();

    let mut payload = json!({
        "model": model,
        "messages": messages,
    });

    if let Some(temperature) = temperature {
        payload["temperature"] = json!(temperature);
    }

    if let Some(format) = response_format {
        payload["response_format"] = json!({
            "type": "json_schema",
            "json_schema": {
                "name": format.name,
                "schema": format.schema,
            }
        });
    }

    payload
}

async fn send_request(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    payload: &Value,
) -> Result<LLMResponse, ProviderError> {
    let started = Instant::now();
    let resp = client
        .post(endpoint)
        .bearer_auth(api_key)
        .json(payload)
        .send()
        .await
        .map_err(|err| ProviderError::Network(err.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|err| ProviderError::Network(err.to_string()))?;
    debug!(
        status = status.as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "chat completion response received"
    );

    if status.is_client_error() || status.is_server_error() {
        return Err(classify_status(status.as_u16(), body));
    }

    let raw: Value = serde_json::from_str(&body).map_err(|err| ProviderError::Parse(err.to_string()))?;
    let content = parse_response(&raw).ok_or(ProviderError::EmptyResponse)?;
    Ok(LLMResponse {
        content,
        raw: Some(raw),
    })
}

fn classify_status(status: u16, body: String) -> ProviderError {
    let lowered = body.to_lowercase();
    if status == 401 || status == 403 {
        return ProviderError::Auth(body);
    }
    if status == 429 || lowered.contains("quota") || lowered.contains("resource_exhausted") {
        return ProviderError::RateLimit(body);
    }
    if status >= 500 {
        return ProviderError::Server { status, body };
    }
    ProviderError::Api { status, body }
}

fn parse_response(raw: &Value) -> Option<String> {
    let first = raw.get("choices")?.as_array()?.first()?;
    let content = first.get("message")?.get("content")?;
    match content {
        Value::String(text) => Some(text.clone()),
        // Some compatible servers return content as a list of text parts.
        Value::Array(parts) => {
            let text: String = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|v| v.as_str()))
                .collect();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}
