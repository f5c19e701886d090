use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{
    DEFAULT_API_BASE, DEFAULT_BACKOFF, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT,
};

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing; nothing is re-read per request.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub llm_max_retries: u32,
    pub llm_timeout: Duration,
    pub llm_backoff: Duration,
    pub embedding_backend: String,
    pub port: u16,
    pub report_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            gemini_api_key: require(&lookup, "GEMINI_API_KEY")?,
            gemini_model: var("GEMINI_MODEL", DEFAULT_MODEL),
            gemini_api_base: var("GEMINI_API_BASE", DEFAULT_API_BASE),
            llm_max_retries: var("LLM_MAX_RETRIES", &DEFAULT_MAX_RETRIES.to_string())
                .parse::<u32>()
                .context("LLM_MAX_RETRIES must be a non-negative integer")?,
            llm_timeout: Duration::from_secs(
                var("LLM_TIMEOUT_SECS", &DEFAULT_TIMEOUT.as_secs().to_string())
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            llm_backoff: Duration::from_millis(
                var("LLM_BACKOFF_MS", &DEFAULT_BACKOFF.as_millis().to_string())
                    .parse::<u64>()
                    .context("LLM_BACKOFF_MS must be a whole number of milliseconds")?,
            ),
            embedding_backend: var("EMBEDDING_BACKEND", "minilm"),
            port: var("PORT", "7860")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            report_path: PathBuf::from(var("REPORT_PATH", "data/report.json")),
            rust_log: var("RUST_LOG", "info"),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}
