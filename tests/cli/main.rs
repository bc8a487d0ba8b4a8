use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod init;
mod prune;
mod update;
mod validate;

const BIN_NAME: &str = "tscat";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Stop config discovery at the temp project
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_file(path: &str, content: &str) -> Result<Self> {
        let test = Self::new()?;
        test.write_file(path, content)?;
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn update_command(&self, catalogs: &[&str], from: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("update").args(catalogs).arg("--from").arg(from);
        cmd
    }

    pub fn prune_command(&self, catalogs: &[&str]) -> Command {
        let mut cmd = self.command();
        cmd.arg("prune").args(catalogs);
        cmd
    }

    pub fn validate_command(&self, catalogs: &[&str]) -> Command {
        let mut cmd = self.command();
        cmd.arg("validate").args(catalogs);
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Output of a finished command with stdout and stderr as text.
pub struct Run {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub fn run(mut cmd: Command) -> Result<Run> {
    let output = cmd.output().context("Failed to run tscat")?;
    Ok(Run {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Russian catalog with two finished messages in context `Host`.
pub const HOST_RU: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="ru">
<context>
    <name>Host</name>
    <message>
        <location filename="src/host.cpp" line="42"/>
        <source>CPU no.%u is not present</source>
        <translation>Процессор №%u отсутствует</translation>
    </message>
    <message>
        <location filename="src/host.cpp" line="80"/>
        <source>Power off</source>
        <translation>Выключить</translation>
    </message>
</context>
</TS>
"#;
