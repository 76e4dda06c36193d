use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::screening::language::TargetLanguage;

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub target_language: TargetLanguage,
    /// Staging folder for uploaded resumes. Purged at startup; each request removes
    /// its own staged file once the run finishes.
    pub docs_folder: PathBuf,
    pub max_requirements_chars: usize,
    pub max_upload_bytes: usize,
    /// Passages returned per resume search.
    pub search_top_k: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: optional_env("LLM_MODEL_NAME", "claude-sonnet-4-5"),
            llm_temperature: parse_env("LLM_TEMPERATURE", 0.7)?,
            target_language: parse_env("TARGET_LANGUAGE", TargetLanguage::default())?,
            docs_folder: PathBuf::from(optional_env("DOCS_FOLDER", "docs")),
            max_requirements_chars: parse_env("MAX_REQUIREMENTS_CHARS", 10_000)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            search_top_k: parse_env("SEARCH_TOP_K", 5)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }

    #[cfg(test)]
    pub fn test_defaults() -> Self {
        Config {
            anthropic_api_key: "sk-test".to_string(),
            llm_model: "claude-sonnet-4-5".to_string(),
            llm_temperature: 0.7,
            target_language: TargetLanguage::Spanish,
            docs_folder: PathBuf::from("docs"),
            max_requirements_chars: 10_000,
            max_upload_bytes: 10 * 1024 * 1024,
            search_top_k: 5,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
