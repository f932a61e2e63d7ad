//! Locates the executable and probes its version and flags.

use crate::discovery::discover_claude;
use crate::error::ClaudeError;
use crate::types::{Capabilities, Feature, InitReport};
use std::path::PathBuf;
use tokio::process::Command;

const FEATURE_CHECKS: &[(Feature, &str)] = &[
    (Feature::JsonOutput, "--output-format"),
    (Feature::ToolsFlag, "--tools"),
    (Feature::AddDir, "--add-dir"),
    (Feature::NoSessionPersistence, "--no-session-persistence"),
    (Feature::SettingSources, "--setting-sources"),
    (Feature::DisableSlashCommands, "--disable-slash-commands"),
];

/// Discovers the Claude CLI, reads its version and probes capabilities.
///
/// # Errors
///
/// Returns `ClaudeError` if the executable cannot be found or an I/O error
/// occurs during probing.
pub async fn init(explicit_path: Option<PathBuf>) -> Result<InitReport, ClaudeError> {
    let path = discover_claude(explicit_path)?;

    let version_output = Command::new(&path).arg("--version").output().await?;
    let version = String::from_utf8_lossy(&version_output.stdout).trim().to_string();

    let help_output = Command::new(&path).arg("--help").output().await?;
    let capabilities = detect_capabilities(&String::from_utf8_lossy(&help_output.stdout));
    tracing::debug!(%version, features = ?capabilities.features, "probed claude");

    Ok(InitReport {
        claude_path: path,
        version,
        capabilities,
    })
}

/// Detects supported flags in `claude --help` output.
#[must_use]
pub fn detect_capabilities(help_text: &str) -> Capabilities {
    let features = FEATURE_CHECKS
        .iter()
        .filter(|(_, pattern)| help_text.contains(pattern))
        .map(|(feature, _)| *feature)
        .collect();
    Capabilities { features }
}
