//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ErrorCode;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_SESSION_DIR: &str = ".quiz-session";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid login path '{0}': must start with '/'")]
    InvalidLoginPath(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidLoginPath(_) => "E_CONFIG_LOGIN_PATH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// API prefix every request path is appended to, without trailing `/`.
    pub api_base_url: String,
    /// Directory backing the file store.
    pub session_dir: PathBuf,
    /// Unauthenticated entry point the app is sent to on rejection.
    pub login_path: String,
    pub timeouts: Timeouts,
}

impl SessionConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `QUIZ_API_BASE_URL`: default `http://127.0.0.1:5000/api`
    /// - `QUIZ_SESSION_DIR`: default `.quiz-session`
    /// - `QUIZ_LOGIN_PATH`: default `/login`
    /// - `QUIZ_REQUEST_TIMEOUT_SECS`: default 30
    /// - `QUIZ_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLoginPath`] when the login path is not absolute.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. `from_env` delegates here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLoginPath`] when the login path is not absolute.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = normalize_base_url(&lookup("QUIZ_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into()));
        let session_dir = PathBuf::from(lookup("QUIZ_SESSION_DIR").unwrap_or_else(|| DEFAULT_SESSION_DIR.into()));
        let login_path = parse_login_path(lookup("QUIZ_LOGIN_PATH").as_deref())?;
        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("QUIZ_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("QUIZ_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_base_url, session_dir, login_path, timeouts })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            login_path: DEFAULT_LOGIN_PATH.into(),
            timeouts: Timeouts::default(),
        }
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_login_path(raw: Option<&str>) -> Result<String, ConfigError> {
    let path = raw.map_or(DEFAULT_LOGIN_PATH, str::trim);
    if !path.starts_with('/') {
        return Err(ConfigError::InvalidLoginPath(path.to_string()));
    }
    Ok(path.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
