use std::env;
use std::fmt::Display;
use std::str::FromStr;

use axum::http::HeaderValue;
use eyre::eyre;
use palaver_core::store_keys::DEFAULT_HISTORY_LIMIT;

pub const DEFAULT_TABLE: &str = "palaver-chat-history";
pub const DEFAULT_REGION: &str = "eu-west-3";
pub const DEFAULT_MODEL_ID: &str = "eu.anthropic.claude-sonnet-4-5-20250929-v1:0";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful and caring AI assistant. \
You can analyze documents and answer questions about them. \
Answer clearly and in a structured way.";

/// Where conversations are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(eyre!("unknown store backend {other:?} (expected dynamodb or memory)")),
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub table: String,
    pub store: StoreBackend,
    pub bedrock_region: String,
    pub model_id: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub history_limit: usize,
    /// `None` allows any origin.
    pub allowed_origin: Option<HeaderValue>,
    pub response_streaming: bool,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            store: StoreBackend::DynamoDb,
            bedrock_region: DEFAULT_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            allowed_origin: None,
            response_streaming: true,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset and empty values take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        Ok(Self {
            table: get("DYNAMODB_TABLE").unwrap_or(defaults.table),
            store: parse(&get, "PALAVER_STORE")?.unwrap_or(defaults.store),
            bedrock_region: get("BEDROCK_REGION").unwrap_or(defaults.bedrock_region),
            model_id: get("BEDROCK_MODEL_ID").unwrap_or(defaults.model_id),
            max_tokens: parse(&get, "BEDROCK_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
            system_prompt: get("PALAVER_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
            history_limit: parse(&get, "PALAVER_HISTORY_LIMIT")?.unwrap_or(defaults.history_limit),
            allowed_origin: parse(&get, "PALAVER_ALLOWED_ORIGIN")?
                .filter(|origin: &HeaderValue| origin != "*"),
            response_streaming: parse(&get, "PALAVER_RESPONSE_STREAMING")?
                .unwrap_or(defaults.response_streaming),
            port: parse(&get, "PORT")?.unwrap_or(defaults.port),
        })
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> eyre::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| eyre!("invalid {key}: {raw:?} ({e})"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> eyre::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.table, "palaver-chat-history");
        assert_eq!(config.store, StoreBackend::DynamoDb);
        assert_eq!(config.bedrock_region, "eu-west-3");
        assert_eq!(config.max_tokens, 4000);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.allowed_origin, None);
        assert!(config.response_streaming);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config(&[
            ("PALAVER_STORE", "memory"),
            ("BEDROCK_MAX_TOKENS", "1024"),
            ("PALAVER_HISTORY_LIMIT", "8"),
            ("PALAVER_ALLOWED_ORIGIN", "https://chat.example.com"),
            ("PALAVER_RESPONSE_STREAMING", "false"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.history_limit, 8);
        assert_eq!(
            config.allowed_origin,
            Some(HeaderValue::from_static("https://chat.example.com"))
        );
        assert!(!config.response_streaming);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn wildcard_origin_means_any() {
        assert_eq!(config(&[("PALAVER_ALLOWED_ORIGIN", "*")]).unwrap().allowed_origin, None);
    }

    #[test]
    fn malformed_values_fail() {
        assert!(config(&[("BEDROCK_MAX_TOKENS", "lots")]).is_err());
        assert!(config(&[("PALAVER_RESPONSE_STREAMING", "yes")]).is_err());
        assert!(config(&[("PALAVER_STORE", "redis")]).is_err());
        assert!(config(&[("PALAVER_ALLOWED_ORIGIN", "bad\norigin")]).is_err());
    }
}
