//! Configuration module for the Schola backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Text or JSON log lines
    pub log_format: LogFormat,
    /// Admin session inactivity timeout
    pub session_timeout: Duration,
    /// Largest serialized value a single store key may hold
    pub max_value_bytes: usize,
    /// API key for draft generation; drafting is disabled when absent
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("SCHOLA_DB_PATH")
            .unwrap_or_else(|_| "./data/schola.sqlite".to_string())
            .into();

        let bind_addr = env::var("SCHOLA_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid SCHOLA_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("SCHOLA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format: LogFormat = parse_var("SCHOLA_LOG_FORMAT", LogFormat::Text)?;

        let session_timeout_secs: u64 = parse_var("SCHOLA_SESSION_TIMEOUT_SECS", 180)?;
        let max_value_bytes: usize = parse_var("SCHOLA_MAX_VALUE_BYTES", 5 * 1024 * 1024)?;

        let gemini_api_key = env::var("SCHOLA_GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let gemini_model =
            env::var("SCHOLA_GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let gemini_base_url = env::var("SCHOLA_GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_format,
            session_timeout: Duration::from_secs(session_timeout_secs),
            max_value_bytes,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("SCHOLA_DB_PATH");
        env::remove_var("SCHOLA_BIND_ADDR");
        env::remove_var("SCHOLA_LOG_LEVEL");
        env::remove_var("SCHOLA_LOG_FORMAT");
        env::remove_var("SCHOLA_SESSION_TIMEOUT_SECS");
        env::remove_var("SCHOLA_MAX_VALUE_BYTES");
        env::remove_var("SCHOLA_GEMINI_API_KEY");
        env::remove_var("SCHOLA_GEMINI_MODEL");
        env::remove_var("SCHOLA_GEMINI_BASE_URL");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/schola.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.session_timeout, Duration::from_secs(180));
        assert_eq!(config.max_value_bytes, 5 * 1024 * 1024);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("SCHOLA_TEST_PARSE_VAR", "three minutes");
        let parsed: Result<u64, _> = parse_var("SCHOLA_TEST_PARSE_VAR", 180);
        assert!(parsed.is_err());
        env::remove_var("SCHOLA_TEST_PARSE_VAR");
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
