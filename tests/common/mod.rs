#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use assert_cmd::Command;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Reference date for every CLI run; samples are seeded relative to it.
pub const TODAY: &str = "2025-04-14";

/// Creates an isolated application home for one test.
pub fn test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// The CLI binary pointed at `home` with a pinned date and no colour.
pub fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("subtrack_cli").expect("binary built");
    cmd.env("SUBTRACK_HOME", home)
        .env("SUBTRACK_TODAY", TODAY)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "error")
        .env_remove("SUBTRACK_CLI_SCRIPT");
    cmd
}

/// Runs `script` through stdin in script mode.
pub fn script(home: &Path, script: &str) -> assert_cmd::assert::Assert {
    cli(home)
        .env("SUBTRACK_CLI_SCRIPT", "1")
        .write_stdin(script.to_string())
        .assert()
}
