//! Shell scripts standing in for `claude` in tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

/// Writes an executable `claude` script with the given body into `dir`.
pub fn fake_claude(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("claude");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
