use std::time::Duration;

use crate::error::ConfigError;
use crate::helpers::{env_opt, load_api_keys};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Endpoint, credentials and model shared by every agent in a pipeline.
#[derive(Clone, Debug)]
pub struct GuardConfig {
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub timeout: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GuardConfig {
    /// Reads `API_KEY` (plus `API_KEY_2`..`API_KEY_10`) and the optional
    /// `MATH_GUARD_*` overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self {
            api_keys: load_api_keys(),
            ..Self::default()
        };
        if let Some(base_url) = env_opt("MATH_GUARD_BASE_URL") {
            cfg.base_url = base_url;
        }
        if let Some(model) = env_opt("MATH_GUARD_MODEL") {
            cfg.model = model;
        }
        if let Some(raw) = env_opt("MATH_GUARD_TEMPERATURE") {
            let temperature = raw
                .parse::<f64>()
                .map_err(|_| ConfigError::Invalid(format!("MATH_GUARD_TEMPERATURE: {raw}")))?;
            cfg.temperature = Some(temperature);
        }
        if let Some(raw) = env_opt("MATH_GUARD_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid(format!("MATH_GUARD_TIMEOUT_SECS: {raw}")))?;
            cfg.timeout = Duration::from_secs(secs);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_keys = vec![key.to_string()];
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_keys.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}
