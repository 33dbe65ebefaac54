//! Client construction options.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::MauticError;

/// How much diagnostic output the client emits through `tracing`.
///
/// Only gates logging; never changes what a call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    None,
    /// Transport failures and API errors.
    Error,
    /// Everything, including every request sent.
    Verbose,
}

impl LogLevel {
    pub fn logs_errors(self) -> bool {
        self != LogLevel::None
    }

    pub fn logs_calls(self) -> bool {
        self == LogLevel::Verbose
    }
}

impl FromStr for LogLevel {
    type Err = MauticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(LogLevel::None),
            "error" => Ok(LogLevel::Error),
            "verbose" => Ok(LogLevel::Verbose),
            other => Err(MauticError::invalid_argument(format!(
                "unknown log level \"{other}\", expected none, error or verbose"
            ))),
        }
    }
}

/// Everything needed to construct a `MauticClient`.
///
/// Deserializes from the camelCase shape used by existing configuration
/// files: `{"apiUrl", "username", "password", "logLevel", "timeoutInSeconds"}`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub api_url: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default)]
    pub timeout_in_seconds: Option<f64>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            username: username.into(),
            password: password.into(),
            log_level: LogLevel::None,
            timeout_in_seconds: None,
        }
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_timeout_in_seconds(mut self, seconds: f64) -> Self {
        self.timeout_in_seconds = Some(seconds);
        self
    }

    /// Per-call timeout in milliseconds; `None` when unset or not positive.
    pub fn timeout_ms(&self) -> Option<u64> {
        self.timeout_in_seconds
            .map(|seconds| (seconds * 1000.0).round())
            .filter(|ms| *ms >= 1.0)
            .map(|ms| ms as u64)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("log_level", &self.log_level)
            .field("timeout_in_seconds", &self.timeout_in_seconds)
            .finish()
    }
}
