#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Day every CLI test treats as today unless it says otherwise
pub const TODAY: &str = "2024-05-10";

pub struct TestData {
    dir: TempDir,
}

impl TestData {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("habit-tracker-data.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join("habits.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_data(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.data_file();
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_data(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let raw = fs::read_to_string(self.data_file())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// `habits` pointed at this data directory with today pinned to [`TODAY`]
    pub fn cmd(&self) -> Command {
        self.cmd_on(TODAY)
    }

    pub fn cmd_on(&self, today: &str) -> Command {
        let mut cmd = habits_cmd();
        cmd.arg("--data-dir").arg(self.path());
        cmd.arg("--today").arg(today);
        cmd
    }

    /// Run a command with `--json` and return the parsed envelope
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        self.json_on(TODAY, args)
    }

    pub fn json_on(&self, today: &str, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self.cmd_on(today).arg("--json").args(args).output()?;
        if !output.status.success() {
            return Err(format!(
                "habits {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stdout)
            )
            .into());
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// Add a habit and return its id
    pub fn add(&self, name: &str) -> Result<String, Box<dyn std::error::Error>> {
        let value = self.json(&["add", name])?;
        value["data"]["habit"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "missing habit id".into())
    }
}

pub fn habits_cmd() -> Command {
    let mut cmd = Command::cargo_bin("habits").expect("binary");
    cmd.env_remove("HABITS_DIR");
    cmd.env_remove("HABITS_TODAY");
    cmd.env_remove("RUST_LOG");
    cmd
}
