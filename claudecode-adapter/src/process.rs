//! Subprocess execution with a timeout.

use crate::error::ClaudeError;
use crate::types::{OutputFormat, RunConfig, RunResult};
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;

/// Runs one `claude --print` invocation to completion.
///
/// Stdout and stderr are captured in full. A non-zero exit, or a JSON
/// envelope flagged `is_error`, is turned into a [`ClaudeError`], with rate
/// limits told apart from other failures.
///
/// # Errors
///
/// Returns `ClaudeError::SpawnFailed` if the process cannot start,
/// `ClaudeError::Timeout` if it outlives `config.timeout` (it is killed), and
/// `ClaudeError::RateLimited`, `NonZeroExit`, `Reported` or `JsonParseError`
/// for unsuccessful runs.
pub async fn run_claude(path: &Path, prompt: &str, config: &RunConfig) -> Result<RunResult, ClaudeError> {
    let args = crate::cmd::build_args(prompt, config);
    let start_time = Instant::now();

    let mut cmd = Command::new(path);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(cwd) = &config.cwd {
        cmd.current_dir(cwd);
    }

    for (k, v) in &config.env {
        cmd.env(k, v);
    }

    tracing::debug!(path = %path.display(), model = ?config.model, "spawning claude");
    let mut child = cmd.spawn()?;
    let mut stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let mut stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

    let stdout_task = tokio::spawn(async move {
        let mut captured = String::new();
        stdout.read_to_string(&mut captured).await.map(|_| captured)
    });
    let stderr_task = tokio::spawn(async move {
        let mut captured = String::new();
        stderr.read_to_string(&mut captured).await.map(|_| captured)
    });

    let wait_task = async {
        let status = child.wait().await?;
        let stdout = stdout_task.await.map_err(std::io::Error::other)??;
        let stderr = stderr_task.await.map_err(std::io::Error::other)??;
        Ok::<_, ClaudeError>((status, stdout, stderr))
    };

    let (status, stdout, stderr) = match timeout(config.timeout, wait_task).await {
        Ok(res) => res?,
        Err(_) => {
            tracing::warn!(timeout = ?config.timeout, "claude timed out, killing process");
            let _ = child.kill().await;
            return Err(ClaudeError::Timeout(config.timeout));
        }
    };

    let exit_code = status.code().unwrap_or(-1);
    let duration_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::debug!(exit_code, duration_ms, "claude finished");

    if !status.success() {
        return Err(ClaudeError::from_exit(exit_code, stdout, stderr));
    }

    let json = match config.output_format {
        OutputFormat::Json => Some(
            serde_json::from_str(stdout.trim()).map_err(|e| ClaudeError::JsonParseError(e.to_string()))?,
        ),
        OutputFormat::Text => None,
    };

    let result = RunResult {
        stdout,
        stderr,
        exit_code,
        duration_ms,
        json,
    };
    if let Some(message) = result.reported_error() {
        return Err(ClaudeError::reported(message));
    }
    Ok(result)
}

fn missing_pipe(name: &str) -> ClaudeError {
    ClaudeError::SpawnFailed(std::io::Error::other(format!("failed to open {name}")))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    /// Writes an executable shell script standing in for `claude`.
    fn fake_claude(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("claude");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_json_envelope_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_claude(&dir, r#"echo '{"type":"result","is_error":false,"result":"hello"}'"#);
        let result = run_claude(&path, "hi", &RunConfig::default()).await.unwrap();
        assert_eq!(result.text(), "hello");
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn test_rate_limit_exit() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_claude(&dir, "echo 'API Error: 429 rate_limit_error' >&2; exit 1");
        let err = run_claude(&path, "hi", &RunConfig::default()).await.unwrap_err();
        assert!(err.is_rate_limit(), "{err}");
    }

    #[tokio::test]
    async fn test_reported_error_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_claude(&dir, r#"echo '{"type":"result","is_error":true,"result":"Invalid API key"}'"#);
        let err = run_claude(&path, "hi", &RunConfig::default()).await.unwrap_err();
        assert!(matches!(err, ClaudeError::Reported(ref m) if m == "Invalid API key"));
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_claude(&dir, "sleep 5");
        let config = RunConfig {
            timeout: Duration::from_millis(200),
            ..RunConfig::default()
        };
        let err = run_claude(&path, "hi", &config).await.unwrap_err();
        assert!(matches!(err, ClaudeError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_text_output_passes_stdout_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = fake_claude(&dir, "echo \"$PWD\"");
        let config = RunConfig {
            output_format: OutputFormat::Text,
            cwd: Some(dir.path().to_path_buf()),
            ..RunConfig::default()
        };
        let result = run_claude(&path, "hi", &config).await.unwrap();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(std::path::Path::new(result.text().trim()).canonicalize().unwrap(), expected);
    }
}
