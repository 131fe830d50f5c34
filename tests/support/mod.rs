#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Reference day used by CLI tests unless a test passes its own.
pub const TODAY: &str = "2024-05-20";

/// An isolated data directory driven through the `habit` binary.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_file(&self) -> PathBuf {
        self.dir.path().join("habits.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join("habit.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// `habit --data-dir <tmp>` with a clean environment and the reference
    /// day set through `HABIT_TODAY`, so `--today` can still override it.
    pub fn habit(&self) -> Command {
        let mut cmd = Command::cargo_bin("habit").expect("binary");
        cmd.env_remove("HABIT_DATA_DIR")
            .env_remove("HABIT_OWNER")
            .env_remove("RUST_LOG")
            .env("HABIT_TODAY", TODAY)
            .arg("--data-dir")
            .arg(self.dir.path());
        cmd
    }

    /// Run with `--json`, assert success, return the envelope's `data`.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .habit()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let envelope: Value = serde_json::from_slice(&output).expect("json envelope");
        assert_eq!(envelope["schema_version"], "habit.v1");
        assert_eq!(envelope["status"], "success");
        envelope["data"].clone()
    }

    /// Run with `--json`, assert the exit code, return the error envelope.
    pub fn json_error(&self, args: &[&str], code: i32) -> Value {
        let output = self
            .habit()
            .arg("--json")
            .args(args)
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        let envelope: Value = serde_json::from_slice(&output).expect("json envelope");
        assert_eq!(envelope["status"], "error");
        envelope
    }

    /// Create a habit for `owner` and return its id.
    pub fn add(&self, owner: &str, title: &str) -> String {
        let data = self.json(&["--owner", owner, "add", title]);
        data["id"].as_str().expect("task id").to_string()
    }
}
