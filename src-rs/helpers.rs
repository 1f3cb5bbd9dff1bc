use std::env;
use std::sync::Arc;

use crate::config::GuardConfig;
use crate::error::ConfigError;
use crate::llm::{OpenAIAdapter, OpenAIConfig, ProviderAdapter};

fn load_keys_from_env(primary: &str, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Ok(raw) = env::var(primary) {
        for item in raw.split(',') {
            let trimmed = item.trim();
            if !trimmed.is_empty() {
                keys.push(trimmed.to_string());
            }
        }
    }
    for idx in 2..=10 {
        let key = format!("{}_{}", prefix, idx);
        if let Ok(value) = env::var(&key) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                keys.push(trimmed.to_string());
            }
        }
    }
    keys
}

pub fn load_api_keys() -> Vec<String> {
    load_keys_from_env("API_KEY", "API_KEY")
}

pub(crate) fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

pub fn build_provider(cfg: &GuardConfig) -> Result<Arc<dyn ProviderAdapter>, ConfigError> {
    cfg.validate()?;
    let adapter = OpenAIAdapter::new(OpenAIConfig {
        api_keys: cfg.api_keys.clone(),
        base_url: cfg.base_url.clone(),
        model: cfg.model.clone(),
        temperature: cfg.temperature,
        timeout: cfg.timeout,
    })?;
    Ok(Arc::new(adapter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_may_hold_a_comma_separated_list() {
        env::set_var("MG_LIST_KEY", "a, b,,c ");
        let keys = load_keys_from_env("MG_LIST_KEY", "MG_LIST_KEY");
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn numbered_keys_follow_the_primary() {
        env::set_var("MG_NUMBERED_KEY", "first");
        env::set_var("MG_NUMBERED_KEY_2", "second");
        env::set_var("MG_NUMBERED_KEY_10", "tenth");
        env::set_var("MG_NUMBERED_KEY_11", "ignored");
        let keys = load_keys_from_env("MG_NUMBERED_KEY", "MG_NUMBERED_KEY");
        assert_eq!(keys, vec!["first", "second", "tenth"]);
    }

    #[test]
    fn blank_entries_are_skipped() {
        env::set_var("MG_BLANK_KEY", "  ");
        env::set_var("MG_BLANK_KEY_2", "");
        env::set_var("MG_BLANK_KEY_3", " only ");
        let keys = load_keys_from_env("MG_BLANK_KEY", "MG_BLANK_KEY");
        assert_eq!(keys, vec!["only"]);
    }

    #[test]
    fn no_keys_when_nothing_is_set() {
        assert!(load_keys_from_env("MG_UNSET_KEY", "MG_UNSET_KEY").is_empty());
    }

    #[test]
    fn env_opt_treats_blank_as_unset() {
        env::set_var("MG_OPT_BLANK", "   ");
        env::set_var("MG_OPT_SET", " value ");
        assert_eq!(env_opt("MG_OPT_BLANK"), None);
        assert_eq!(env_opt("MG_OPT_SET").as_deref(), Some("value"));
    }
}
