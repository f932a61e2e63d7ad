//! Locating the `claude` executable.

use crate::error::ClaudeError;
use std::path::PathBuf;

/// Environment variable that overrides the Claude CLI binary path.
pub const CC_BIN_ENV_VAR: &str = "HOT_DEALS_CLAUDE_BIN";

/// Finds the Claude CLI.
///
/// An explicit path wins and must exist. Otherwise `HOT_DEALS_CLAUDE_BIN` is
/// tried (ignored if it points nowhere), then `claude` on `$PATH`.
///
/// # Errors
///
/// Returns `ClaudeError::ExecutableNotFound` when no candidate exists.
pub fn discover_claude(explicit_path: Option<PathBuf>) -> Result<PathBuf, ClaudeError> {
    discover_with(explicit_path, std::env::var_os(CC_BIN_ENV_VAR).map(PathBuf::from))
}

fn discover_with(explicit: Option<PathBuf>, from_env: Option<PathBuf>) -> Result<PathBuf, ClaudeError> {
    if let Some(path) = explicit {
        return if path.exists() {
            Ok(path)
        } else {
            Err(ClaudeError::ExecutableNotFound(format!(
                "{} does not exist",
                path.display()
            )))
        };
    }

    match from_env {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "claude from {CC_BIN_ENV_VAR}");
            return Ok(path);
        }
        Some(path) => {
            tracing::warn!(path = %path.display(), "{CC_BIN_ENV_VAR} does not exist, searching PATH");
        }
        None => {}
    }

    which::which("claude").map_err(|e| {
        ClaudeError::ExecutableNotFound(format!(
            "{e}; install with `npm i -g @anthropic-ai/claude-code` or set {CC_BIN_ENV_VAR}"
        ))
    })
}
