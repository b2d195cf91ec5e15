use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::CompletionPolicy;

const DEFAULT_MODEL: &str = "gemini-pro";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub completion_policy: CompletionPolicy,
    /// `APP_ENV=development` exposes error details in API responses.
    pub development: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gemini_api_key = require_env("GEMINI_API_KEY")
            .or_else(|_| require_env("NEXT_PUBLIC_GEMINI_API_KEY"))
            .context("GEMINI_API_KEY must be set to call the completion service")?;

        let completion_policy = completion_policy(
            parse_env("LLM_MAX_ATTEMPTS", 1)?,
            parse_env("LLM_BACKOFF_MS", 1000)?,
            parse_env("LLM_DEADLINE_SECS", 60)?,
        )?;

        Ok(Config {
            gemini_api_key,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            completion_policy,
            development: is_development(std::env::var("APP_ENV").ok().as_deref()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn completion_policy(
    max_attempts: u32,
    backoff_ms: u64,
    deadline_secs: u64,
) -> Result<CompletionPolicy> {
    if max_attempts == 0 {
        anyhow::bail!("LLM_MAX_ATTEMPTS must be at least 1");
    }
    Ok(CompletionPolicy {
        max_attempts,
        initial_backoff: Duration::from_millis(backoff_ms),
        deadline: Duration::from_secs(deadline_secs),
    })
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn is_development(app_env: Option<&str>) -> bool {
    match app_env.map(str::trim) {
        Some(env) => env.eq_ignore_ascii_case("development") || env.eq_ignore_ascii_case("dev"),
        None => false,
    }
}
