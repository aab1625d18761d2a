use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api_client::DEFAULT_BASE_URL;

pub const DEFAULT_SESSION_FILE: &str = ".sourcematch-session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
/// Every setting has a default, so a bare environment works against a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let request_timeout = match lookup("SOURCEMATCH_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .context("SOURCEMATCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => defaults.request_timeout,
        };

        Ok(Config {
            api_url: lookup("SOURCEMATCH_API_URL").unwrap_or(defaults.api_url),
            session_file: lookup("SOURCEMATCH_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            request_timeout,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}
