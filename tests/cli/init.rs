use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, HOST_RU, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["pluralForms", "locations", "sourceLanguage", "catalogs", "ignores"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["locations"], "absolute");
    assert_eq!(parsed["sourceLanguage"], "en");

    // 2-space indentation
    assert!(content.contains("\n  \""), "Config should be pretty-printed");

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .tscatrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".tscatrc.json").exists());
    let content = test.read_file(".tscatrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".tscatrc.json", "{}")?;

    let out = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("Error: .tscatrc.json already exists"));
    assert_eq!(test.read_file(".tscatrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", HOST_RU)?;

    test.command().arg("init").output()?;

    let output = test.validate_command(&["nls/app_ru.ts"]).output()?;
    assert!(
        output.status.success(),
        "validate should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}
