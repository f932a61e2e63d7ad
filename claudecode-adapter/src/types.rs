//! Run configuration, tool policy, probed features and run results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// What `--output-format` asks for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    /// The reply text alone. The flag is omitted, for builds without it.
    Text,
    /// Single JSON envelope with a `result` field.
    Json,
}

/// Value of the `--tools` flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum BuiltinToolSet {
    /// Flag omitted.
    Default,
    /// A comma-joined list.
    Explicit(Vec<String>),
}

/// Which tools a run may touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPolicy {
    /// Built-in tools offered to the model.
    pub builtin: BuiltinToolSet,
    /// Tools allowed without a permission prompt.
    pub allowed: Option<Vec<String>>,
    /// Adds `--disable-slash-commands`.
    pub disable_slash_commands: bool,
}

impl ToolPolicy {
    /// The `Read` tool alone, pre-approved.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            builtin: BuiltinToolSet::Explicit(vec!["Read".to_string()]),
            allowed: Some(vec!["Read".to_string()]),
            disable_slash_commands: true,
        }
    }
}

impl Default for ToolPolicy {
    fn default() -> Self {
        Self {
            builtin: BuiltinToolSet::Default,
            allowed: None,
            disable_slash_commands: false,
        }
    }
}

/// A flag that only some `claude` builds accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// The `--output-format json` envelope.
    JsonOutput,
    /// The `--tools` flag.
    ToolsFlag,
    /// The `--add-dir` flag.
    AddDir,
    /// The `--no-session-persistence` flag.
    NoSessionPersistence,
    /// The `--setting-sources` flag.
    SettingSources,
    /// The `--disable-slash-commands` flag.
    DisableSlashCommands,
}

/// Flags found in `claude --help`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Supported flags.
    pub features: BTreeSet<Feature>,
}

impl Capabilities {
    /// Whether `feature` was found.
    #[must_use]
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }
}

/// What [`crate::init`] learned about the executable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitReport {
    /// Executable that answered the probes.
    pub claude_path: PathBuf,
    /// First line of `claude --version`.
    pub version: String,
    /// Flags it accepts.
    pub capabilities: Capabilities,
}

/// Settings for one print-mode run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Model name override (e.g. `"sonnet"`).
    pub model: Option<String>,
    /// Requested output shape.
    pub output_format: OutputFormat,
    /// Tool restrictions.
    pub tools: ToolPolicy,
    /// Extra directories the CLI may read from.
    pub add_dirs: Vec<PathBuf>,
    /// The process is killed once this elapses.
    pub timeout: Duration,
    /// Working directory of the child.
    pub cwd: Option<PathBuf>,
    /// Added to the child's environment.
    pub env: Vec<(String, String)>,
    /// Adds `--no-session-persistence`.
    pub no_session_persistence: bool,
    /// Overrides which setting sources the CLI loads.
    ///
    /// `Some("")` skips user configuration entirely (CLAUDE.md, hooks and MCP
    /// servers from `~/.claude/settings.json`). `None` omits the flag.
    pub setting_sources: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: None,
            output_format: OutputFormat::Json,
            tools: ToolPolicy::default(),
            add_dirs: Vec::new(),
            timeout: Duration::from_secs(300),
            cwd: None,
            env: Vec::new(),
            no_session_persistence: false,
            setting_sources: None,
        }
    }
}

/// Output of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Everything written to stdout.
    pub stdout: String,
    /// Everything written to stderr.
    pub stderr: String,
    /// `-1` when the process was killed by a signal.
    pub exit_code: i32,
    /// Elapsed time in milliseconds.
    pub duration_ms: u64,
    /// The JSON envelope, for [`OutputFormat::Json`] runs that printed one.
    pub json: Option<serde_json::Value>,
}

impl RunResult {
    /// The model's reply: the envelope's `result` field, or raw stdout for text output.
    #[must_use]
    pub fn text(&self) -> &str {
        self.json
            .as_ref()
            .and_then(|envelope| envelope.get("result"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or(&self.stdout)
    }

    /// The error message of an envelope flagged `is_error`, if any.
    #[must_use]
    pub fn reported_error(&self) -> Option<&str> {
        let envelope = self.json.as_ref()?;
        if envelope.get("is_error") != Some(&serde_json::Value::Bool(true)) {
            return None;
        }
        Some(
            envelope
                .get("result")
                .or_else(|| envelope.get("error"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("Unknown error"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(json: Option<serde_json::Value>) -> RunResult {
        RunResult {
            stdout: "raw stdout".to_string(),
            stderr: String::new(),
            exit_code: 0,
            duration_ms: 10,
            json,
        }
    }

    #[test]
    fn test_text_prefers_envelope_result() {
        let r = result(Some(json!({"type": "result", "is_error": false, "result": "{\"hot_deals\": []}"})));
        assert_eq!(r.text(), "{\"hot_deals\": []}");
        assert!(r.reported_error().is_none());
        assert_eq!(result(None).text(), "raw stdout");
    }

    #[test]
    fn test_reported_error() {
        let r = result(Some(json!({"is_error": true, "result": "Credit balance is too low"})));
        assert_eq!(r.reported_error(), Some("Credit balance is too low"));
    }

    #[test]
    fn test_read_only_policy() {
        let policy = ToolPolicy::read_only();
        assert_eq!(policy.builtin, BuiltinToolSet::Explicit(vec!["Read".to_string()]));
        assert!(policy.disable_slash_commands);
    }
}
