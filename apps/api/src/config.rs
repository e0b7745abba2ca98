use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::report::layout::{DEFAULT_LINES_PER_PAGE, DEFAULT_LINE_WIDTH};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub evaluations_file: PathBuf,
    /// Assist endpoints answer 503 when unset.
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_attempts: u32,
    pub report_line_width: usize,
    pub report_lines_per_page: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            evaluations_file: std::env::var("EVALUATIONS_FILE")
                .unwrap_or_else(|_| "data/evaluations.json".to_string())
                .into(),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", 1)?,
            report_line_width: parse_env("REPORT_LINE_WIDTH", DEFAULT_LINE_WIDTH)?,
            report_lines_per_page: parse_env("REPORT_LINES_PER_PAGE", DEFAULT_LINES_PER_PAGE)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
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
