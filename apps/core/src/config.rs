//! Runtime configuration.
//!
//! Read once at startup from the process environment, after an optional
//! `.env` file has been merged in. Every key is optional.

use serde::Serialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use validator::Validate;

use crate::brain::AnswerLimits;
use crate::error::AppError;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_WIKIPEDIA_API_URL: &str = "https://ru.wikipedia.org/w/api.php";
pub const DEFAULT_WIKIPEDIA_PAGE_URL: &str = "https://ru.wikipedia.org/wiki/";

#[derive(Debug, Clone, Serialize, Validate)]
pub struct BotConfig {
    /// Telegram bot token. The console transport is used when unset.
    #[serde(skip_serializing)]
    pub telegram_token: Option<String>,
    #[validate(url)]
    pub telegram_api_url: String,
    #[validate(url)]
    pub wikipedia_api_url: String,
    /// Base for page links when the API response carries no `fullurl`.
    #[validate(url)]
    pub wikipedia_page_url: String,
    #[validate(range(min = 1, max = 120))]
    pub lookup_timeout_secs: u64,
    #[validate(range(min = 100, max = 4096))]
    pub max_answer_chars: usize,
    #[validate(range(min = 100, max = 500))]
    pub summary_chars: usize,
    /// Seed for the general-reply picker; entropy when unset.
    pub reply_seed: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: None,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            wikipedia_api_url: DEFAULT_WIKIPEDIA_API_URL.to_string(),
            wikipedia_page_url: DEFAULT_WIKIPEDIA_PAGE_URL.to_string(),
            lookup_timeout_secs: 10,
            max_answer_chars: 4000,
            summary_chars: 400,
            reply_seed: None,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} must be a number ({}): {}", key, value, e))),
    }
}

impl BotConfig {
    /// Merges `.env` (if any) into the environment and reads the config.
    pub fn load() -> Result<Self, AppError> {
        match dotenv::dotenv() {
            Ok(path) => info!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(AppError::Config(format!(".env file: {}", e))),
        }
        Self::from_process_env()
    }

    pub fn from_process_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            telegram_token: get("TELEGRAM_TOKEN"),
            telegram_api_url: get("TELEGRAM_API_URL").unwrap_or(defaults.telegram_api_url),
            wikipedia_api_url: get("WIKIPEDIA_API_URL").unwrap_or(defaults.wikipedia_api_url),
            wikipedia_page_url: get("WIKIPEDIA_PAGE_URL").unwrap_or(defaults.wikipedia_page_url),
            lookup_timeout_secs: parse_var(
                "LOOKUP_TIMEOUT_SECS",
                get("LOOKUP_TIMEOUT_SECS"),
                defaults.lookup_timeout_secs,
            )?,
            max_answer_chars: parse_var(
                "MAX_ANSWER_CHARS",
                get("MAX_ANSWER_CHARS"),
                defaults.max_answer_chars,
            )?,
            summary_chars: parse_var("SUMMARY_CHARS", get("SUMMARY_CHARS"), defaults.summary_chars)?,
            reply_seed: match get("REPLY_SEED") {
                Some(raw) => Some(parse_var("REPLY_SEED", Some(raw), 0u64)?),
                None => None,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub fn answer_limits(&self) -> AnswerLimits {
        AnswerLimits {
            max_answer_chars: self.max_answer_chars,
            summary_chars: self.summary_chars,
        }
    }
}
