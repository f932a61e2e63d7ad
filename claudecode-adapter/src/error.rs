//! Errors returned by adapter operations.

use std::time::Duration;
use thiserror::Error;

/// Substrings in CLI output that mean the provider refused the request for quota reasons.
const RATE_LIMIT_MARKERS: &[&str] = &[
    "rate limit",
    "rate_limit",
    "429",
    "overloaded",
    "usage limit",
    "quota",
];

/// Failure of a Claude CLI invocation.
#[derive(Debug, Error)]
pub enum ClaudeError {
    /// No usable `claude` executable was found.
    #[error("Claude executable not found: {0}")]
    ExecutableNotFound(String),

    /// The process could not be spawned or its pipes failed.
    #[error("Failed to spawn process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// The process ran past the configured timeout and was killed.
    #[error("Process timed out after {0:?}")]
    Timeout(Duration),

    /// The provider rejected the request because of rate or usage limits.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The process exited unsuccessfully.
    #[error("Process exited with non-zero status: {exit_code}\nSTDOUT: {stdout}\nSTDERR: {stderr}")]
    NonZeroExit {
        /// Exit code, `-1` if the process was killed by a signal.
        exit_code: i32,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The CLI reported an error inside its JSON envelope.
    #[error("Claude reported an error: {0}")]
    Reported(String),

    /// JSON output was requested but stdout was not JSON.
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(String),
}

impl ClaudeError {
    /// Classifies a failed run, preferring [`ClaudeError::RateLimited`] when
    /// the output mentions a rate or usage limit.
    #[must_use]
    pub fn from_exit(exit_code: i32, stdout: String, stderr: String) -> Self {
        if mentions_rate_limit(&stderr) || mentions_rate_limit(&stdout) {
            let message = if stderr.trim().is_empty() { &stdout } else { &stderr };
            return Self::RateLimited(message.trim().to_string());
        }
        Self::NonZeroExit {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Classifies an error message reported inside a successful exit.
    #[must_use]
    pub fn reported(message: &str) -> Self {
        if mentions_rate_limit(message) {
            Self::RateLimited(message.to_string())
        } else {
            Self::Reported(message.to_string())
        }
    }

    /// Whether retrying later could succeed.
    #[must_use]
    pub const fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

fn mentions_rate_limit(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    RATE_LIMIT_MARKERS.iter().any(|marker| lower.contains(marker))
}
