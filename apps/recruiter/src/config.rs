use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Connection settings for the local model server.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    /// Informational label only; the server decides which weights are loaded.
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; the model server is local.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub data_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub sender_email: String,
    pub sender_name: String,
    pub company_name: String,
    pub default_interview_duration: u32,
    pub default_meeting_duration: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            llm: LlmConfig {
                base_url: get("LLM_BASE_URL", "http://127.0.0.1:8080"),
                model: get("LLM_MODEL", "llama-3-8b-instruct"),
                timeout_secs: parse_var(&lookup, "LLM_TIMEOUT_SECS", 120)?,
                max_retries: parse_var(&lookup, "LLM_MAX_RETRIES", 0)?,
            },
            data_dir: PathBuf::from(get("DATA_DIR", "data")),
            port: parse_var(&lookup, "PORT", 5000)?,
            rust_log: get("RUST_LOG", "info"),
            sender_email: get("SENDER_EMAIL", "recruitment@company.com"),
            sender_name: get("SENDER_NAME", "Company Recruitment Team"),
            company_name: get("COMPANY_NAME", "Our Company"),
            default_interview_duration: parse_var(&lookup, "DEFAULT_INTERVIEW_DURATION", 45)?,
            default_meeting_duration: parse_var(&lookup, "DEFAULT_MEETING_DURATION", 60)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.llm.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.llm.max_retries, 0);
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.company_name, "Our Company");
        assert_eq!(config.default_interview_duration, 45);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("LLM_BASE_URL", "http://gpu-box:9000"),
            ("PORT", "8081"),
            ("LLM_MAX_RETRIES", "2"),
            ("DATA_DIR", "/var/lib/recruiter"),
        ]))
        .unwrap();
        assert_eq!(config.llm.base_url, "http://gpu-box:9000");
        assert_eq!(config.port, 8081);
        assert_eq!(config.llm.max_retries, 2);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/recruiter"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
