use std::fmt;

use anyhow::{Context, Result};

const DEFAULT_MODEL: &str = "gpt-5-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Local frontend origins that are always allowed, after `FRONTEND_ORIGIN`.
const DEV_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub frontend_origin: Option<String>,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_upload_mb = optional_env("MAX_UPLOAD_MB")
            .unwrap_or_else(|| "10".to_string())
            .parse::<usize>()
            .context("MAX_UPLOAD_MB must be a whole number of megabytes")?;

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_model: optional_env("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            frontend_origin: optional_env("FRONTEND_ORIGIN"),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Origins permitted by the CORS layer. The deployed frontend goes first.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.frontend_origin
            .iter()
            .cloned()
            .chain(DEV_ORIGINS.iter().map(|o| o.to_string()))
            .collect()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("frontend_origin", &self.frontend_origin)
            .field("port", &self.port)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        openai_api_key: "sk-test".to_string(),
        openai_model: "gpt-test".to_string(),
        openai_base_url: DEFAULT_BASE_URL.to_string(),
        frontend_origin: None,
        port: 8080,
        max_upload_bytes: 10 * 1024 * 1024,
        rust_log: "info".to_string(),
    }
}
