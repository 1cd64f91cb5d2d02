//! Process configuration
//!
//! Built once at start-up (after `.env` is loaded) and handed to the
//! clients and the router. Nothing reads the environment after this.

use crate::error::AssistantError;
use crate::Result;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-nano";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub yahoo_base_url: String,
    pub port: u16,
    pub oracle_timeout: Duration,
    pub provider_timeout: Duration,
    pub price_history_days: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            yahoo_base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            oracle_timeout: Duration::from_secs(30),
            provider_timeout: Duration::from_secs(10),
            price_history_days: 14,
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => parse_value::<u16>("PORT", &raw)?,
            None => defaults.port,
        };

        let oracle_timeout = non_empty("ORACLE_TIMEOUT_SECS")
            .map(|raw| parse_timeout("ORACLE_TIMEOUT_SECS", &raw))
            .transpose()?
            .unwrap_or(defaults.oracle_timeout);

        let provider_timeout = non_empty("PROVIDER_TIMEOUT_SECS")
            .map(|raw| parse_timeout("PROVIDER_TIMEOUT_SECS", &raw))
            .transpose()?
            .unwrap_or(defaults.provider_timeout);

        let price_history_days = non_empty("PRICE_HISTORY_DAYS")
            .map(|raw| parse_value::<usize>("PRICE_HISTORY_DAYS", &raw))
            .transpose()?
            .unwrap_or(defaults.price_history_days);

        if price_history_days == 0 {
            return Err(AssistantError::ConfigError(
                "PRICE_HISTORY_DAYS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            yahoo_base_url: non_empty("YAHOO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.yahoo_base_url),
            port,
            oracle_timeout,
            provider_timeout,
            price_history_days,
        })
    }
}

/// Whole seconds, at least one
fn parse_timeout(key: &str, raw: &str) -> Result<Duration> {
    match parse_value::<u64>(key, raw)? {
        0 => Err(AssistantError::ConfigError(format!("{} must be at least 1", key))),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse::<T>().map_err(|_| {
        AssistantError::ConfigError(format!("{} has an invalid value: {:?}", key, raw))
    })
}
