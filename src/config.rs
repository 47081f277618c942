//! Runtime configuration read from the environment.
//!
//! `.env` is loaded first (desktop dev); builds without one fall back to the
//! bundled `assets/config.env`. Variables already set always win.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Bundled config for builds without a `.env` (mobile, web)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u64 = 1000;
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} must be a socket address, got {value:?}")]
    InvalidAddr { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    /// Custom JSON chat endpoint; takes priority over OpenAI when set.
    pub llm_endpoint: Option<String>,
    pub llm_api_key: Option<String>,
    pub temperature: f64,
    pub max_tokens: u64,
    pub bind_addr: SocketAddr,
    /// Base URL the client uses to reach the API proxy.
    pub api_url: String,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            llm_endpoint: None,
            llm_api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let temperature = match non_empty("LLM_TEMPERATURE") {
            Some(value) => value
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "LLM_TEMPERATURE",
                    value,
                })?,
            None => DEFAULT_TEMPERATURE,
        };
        let max_tokens = match non_empty("LLM_MAX_TOKENS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "LLM_MAX_TOKENS",
                    value,
                })?,
            None => DEFAULT_MAX_TOKENS,
        };
        let addr = non_empty("GOLDRUSH_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let bind_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                key: "GOLDRUSH_ADDR",
                value: addr.clone(),
            })?;

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_endpoint: non_empty("LLM_ENDPOINT"),
            llm_api_key: non_empty("LLM_API_KEY"),
            temperature,
            max_tokens,
            bind_addr,
            api_url: non_empty("GOLDRUSH_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            data_dir: non_empty("GOLDRUSH_DATA_DIR").map(PathBuf::from),
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
pub fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_env_lines(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if std::env::var(key).is_err() {
            // SAFETY: We're setting env vars at startup before any threads are spawned
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
}

/// `KEY=VALUE` pairs, skipping blanks and `#` comments.
fn parse_env_lines(source: &str) -> Vec<(&str, &str)> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.bind_addr, DEFAULT_ADDR.parse().unwrap());
        assert!(config.openai_api_key.is_none());
        assert!(config.llm_endpoint.is_none());
    }

    #[test]
    fn default_matches_empty_environment() {
        assert_eq!(Config::default(), Config::from_lookup(lookup(&[])).unwrap());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn api_url_drops_trailing_slash() {
        let config =
            Config::from_lookup(lookup(&[("GOLDRUSH_API_URL", "http://demo.local/")])).unwrap();
        assert_eq!(config.api_url, "http://demo.local");
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = Config::from_lookup(lookup(&[("LLM_MAX_TOKENS", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "LLM_MAX_TOKENS",
                value: "lots".into()
            }
        );
        assert!(Config::from_lookup(lookup(&[("GOLDRUSH_ADDR", "nowhere")])).is_err());
    }

    #[test]
    fn bundled_config_parses() {
        let pairs = parse_env_lines(BUNDLED_CONFIG);
        assert!(pairs.contains(&("OPENAI_MODEL", "gpt-4o")));
        assert!(pairs.iter().all(|(key, _)| !key.starts_with('#')));
    }
}
