//! Runs the `claude` CLI as a one-shot document reader.
//!
//! Each run is a single print-mode invocation with read-only tools and no
//! session persistence. Failed runs are classified so callers can tell a
//! quota refusal from any other failure.

/// Argument list for one print-mode run.
pub mod cmd;
/// Locating the `claude` executable.
pub mod discovery;
/// Run failures and their classification.
pub mod error;
/// Version and feature probing.
pub mod init;
/// Spawning a run and collecting its output.
pub mod process;
/// Run configuration, tool policy and results.
pub mod types;

pub use discovery::{discover_claude, CC_BIN_ENV_VAR};
pub use error::ClaudeError;
pub use init::init;
pub use process::run_claude;
pub use types::*;

/// A located `claude` executable and what it supports.
#[derive(Debug, Clone)]
pub struct ClaudeCli {
    /// Path to the executable.
    pub path: std::path::PathBuf,
    /// Features found in `--help`.
    pub capabilities: types::Capabilities,
}

impl ClaudeCli {
    /// Wraps an already resolved executable.
    #[must_use]
    pub const fn new(path: std::path::PathBuf, capabilities: types::Capabilities) -> Self {
        Self { path, capabilities }
    }

    /// Builds a client from an [`InitReport`].
    #[must_use]
    pub fn from_report(report: InitReport) -> Self {
        Self::new(report.claude_path, report.capabilities)
    }

    /// Sends `prompt` in a single run and waits for it to finish.
    ///
    /// # Errors
    ///
    /// See [`run_claude`].
    pub async fn run(&self, prompt: &str, config: &types::RunConfig) -> Result<types::RunResult, ClaudeError> {
        run_claude(&self.path, prompt, config).await
    }
}
