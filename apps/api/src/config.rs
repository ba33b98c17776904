use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Per-call timeout for the completion service.
    pub llm_timeout_secs: u64,
    /// Retries on 429/5xx. Zero disables retry entirely.
    pub llm_max_retries: u32,
    /// Upper bound on in-flight completion calls within one request.
    pub llm_concurrency: usize,
    pub default_match_limit: usize,
    pub max_match_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 0)?,
            llm_concurrency: parse_env("LLM_CONCURRENCY", 3)?,
            default_match_limit: parse_env("DEFAULT_MATCH_LIMIT", 10)?,
            max_match_limit: parse_env("MAX_MATCH_LIMIT", 50)?,
        };

        if config.llm_concurrency == 0 {
            anyhow::bail!("LLM_CONCURRENCY must be at least 1");
        }
        if config.default_match_limit > config.max_match_limit {
            anyhow::bail!("DEFAULT_MATCH_LIMIT must not exceed MAX_MATCH_LIMIT");
        }

        Ok(config)
    }

    /// Resolves a caller-supplied match limit against the configured default and cap.
    pub fn match_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_match_limit)
            .clamp(1, self.max_match_limit)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/scholarlens_test".to_string(),
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            llm_timeout_secs: 5,
            llm_max_retries: 0,
            llm_concurrency: 2,
            default_match_limit: 10,
            max_match_limit: 50,
        }
    }
}
