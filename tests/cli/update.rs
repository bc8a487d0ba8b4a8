use anyhow::Result;

use crate::{CliTest, HOST_RU, run};

const POWER_OFF_ONLY: &str = r#"[
    {
        "context": "Host",
        "source": "Power off",
        "location": { "file": "src/host.cpp", "line": 81 }
    }
]"#;

#[test]
fn test_update_creates_missing_catalog() -> Result<()> {
    let test = CliTest::with_file(
        "strings.json",
        r#"[
            { "context": "Host", "source": "Power off", "location": { "file": "src/host.cpp", "line": 81 } },
            { "context": "Host", "source": "%n CPU(s)", "plural": true }
        ]"#,
    )?;

    let out = run(test.update_command(&["nls/VirtualBox_ru.ts"], "strings.json"))?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Creating 'nls/VirtualBox_ru.ts'..."));
    assert!(
        out.stdout
            .contains("Found 2 source text(s) (2 new and 0 already existing)")
    );
    assert!(out.stdout.contains("Wrote 1 catalog(s)"));

    let catalog = test.read_file("nls/VirtualBox_ru.ts")?;
    assert!(catalog.contains(r#"<TS version="2.1" language="ru" sourcelanguage="en">"#));
    assert!(catalog.contains(r#"<location filename="src/host.cpp" line="81"/>"#));
    assert!(catalog.contains(r#"<translation type="unfinished"></translation>"#));
    assert_eq!(catalog.matches("<numerusform></numerusform>").count(), 3);
    Ok(())
}

#[test]
fn test_update_marks_missing_message_vanished() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", HOST_RU)?;
    test.write_file("strings.json", POWER_OFF_ONLY)?;

    let out = run(test.update_command(&["nls/app_ru.ts"], "strings.json"))?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Updating 'nls/app_ru.ts'..."));
    assert!(
        out.stdout
            .contains("Found 1 source text(s) (0 new and 1 already existing)")
    );
    assert!(out.stdout.contains("Kept 1 obsolete entries"));

    let catalog = test.read_file("nls/app_ru.ts")?;
    assert!(
        catalog.contains(r#"<translation type="vanished">Процессор №%u отсутствует</translation>"#)
    );
    assert!(!catalog.contains(r#"line="42""#));
    assert!(catalog.contains(r#"<location filename="src/host.cpp" line="81"/>"#));
    assert!(catalog.contains("<translation>Выключить</translation>"));
    Ok(())
}

#[test]
fn test_update_no_obsolete_drops_vanished() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", HOST_RU)?;
    test.write_file("strings.json", POWER_OFF_ONLY)?;

    let mut cmd = test.update_command(&["nls/app_ru.ts"], "strings.json");
    cmd.arg("--no-obsolete");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Removed 1 obsolete entries"));
    let catalog = test.read_file("nls/app_ru.ts")?;
    assert!(!catalog.contains("CPU no.%u is not present"));
    Ok(())
}

#[test]
fn test_update_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", HOST_RU)?;
    test.write_file("strings.json", POWER_OFF_ONLY)?;

    let mut cmd = test.update_command(&["nls/app_ru.ts", "nls/app_de.ts"], "strings.json");
    cmd.arg("--dry-run");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Would write 2 catalog(s)."));
    assert_eq!(test.read_file("nls/app_ru.ts")?, HOST_RU);
    assert!(!test.root().join("nls/app_de.ts").exists());
    Ok(())
}

#[test]
fn test_update_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", HOST_RU)?;
    test.write_file("strings.json", POWER_OFF_ONLY)?;

    run(test.update_command(&["nls/app_ru.ts"], "strings.json"))?;
    let first = test.read_file("nls/app_ru.ts")?;

    let out = run(test.update_command(&["nls/app_ru.ts"], "strings.json"))?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("All catalogs are up to date"));
    assert_eq!(test.read_file("nls/app_ru.ts")?, first);
    Ok(())
}

#[test]
fn test_update_failure_writes_no_catalog() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", HOST_RU)?;
    test.write_file(
        "strings.json",
        r#"[{ "context": "Host", "source": "%n CPU(s)", "plural": true }]"#,
    )?;

    // No locale can be derived from "messages.ts", so the plural message fails there
    let out = run(test.update_command(&["nls/app_ru.ts", "nls/messages.ts"], "strings.json"))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("catalog has no target language"));
    assert!(out.stdout.contains("--> nls/messages.ts"));
    assert!(out.stdout.contains("no catalog was written"));
    assert_eq!(test.read_file("nls/app_ru.ts")?, HOST_RU);
    assert!(!test.root().join("nls/messages.ts").exists());
    Ok(())
}

#[test]
fn test_update_locale_flag_names_new_catalog_language() -> Result<()> {
    let test = CliTest::with_file(
        "strings.json",
        r#"[{ "context": "Host", "source": "%n CPU(s)", "plural": true }]"#,
    )?;

    let mut cmd = test.update_command(&["nls/messages.ts"], "strings.json");
    cmd.args(["--locale", "ja"]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    let catalog = test.read_file("nls/messages.ts")?;
    assert!(catalog.contains(r#"language="ja""#));
    assert_eq!(catalog.matches("<numerusform>").count(), 1);
    Ok(())
}

#[test]
fn test_update_warns_about_duplicate_extraction() -> Result<()> {
    let test = CliTest::with_file(
        "strings.json",
        r#"[
            { "context": "Host", "source": "Open", "location": { "file": "a.cpp", "line": 1 } },
            { "context": "Host", "source": "Open", "location": { "file": "b.cpp", "line": 2 } }
        ]"#,
    )?;

    let out = run(test.update_command(&["app_de.ts"], "strings.json"))?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("warning: Host::\"Open\"  duplicate-extracted"));
    assert!(out.stdout.contains("entry #1 at b.cpp:2 dropped, keeping a.cpp:1"));

    let catalog = test.read_file("app_de.ts")?;
    assert!(catalog.contains(r#"filename="a.cpp""#));
    assert!(!catalog.contains(r#"filename="b.cpp""#));
    Ok(())
}

#[test]
fn test_update_relative_locations() -> Result<()> {
    let test = CliTest::with_file(
        "strings.json",
        r#"[
            { "context": "Host", "source": "One", "location": { "file": "a.cpp", "line": 10 } },
            { "context": "Host", "source": "Two", "location": { "file": "a.cpp", "line": 14 } }
        ]"#,
    )?;

    let mut cmd = test.update_command(&["app_de.ts"], "strings.json");
    cmd.args(["--locations", "relative"]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    let catalog = test.read_file("app_de.ts")?;
    assert!(catalog.contains(r#"<location filename="a.cpp" line="+10"/>"#));
    assert!(catalog.contains(r#"<location filename="a.cpp" line="+4"/>"#));
    Ok(())
}

#[test]
fn test_update_uses_config_catalogs() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", HOST_RU)?;
    test.write_file("strings.json", POWER_OFF_ONLY)?;
    test.write_file(".tscatrc.json", r#"{ "catalogs": ["nls/*.ts"] }"#)?;

    let mut cmd = test.command();
    cmd.args(["update", "--from", "strings.json"]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Updating 'nls/app_ru.ts'..."));
    assert!(test.read_file("nls/app_ru.ts")?.contains("type=\"vanished\""));
    Ok(())
}

#[test]
fn test_update_rejects_invalid_extracted_list() -> Result<()> {
    let test = CliTest::with_file("strings.json", r#"{ "context": "Host" }"#)?;

    let out = run(test.update_command(&["app_de.ts"], "strings.json"))?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Failed to parse extracted message list"));
    assert!(!test.root().join("app_de.ts").exists());
    Ok(())
}

#[test]
fn test_update_reports_broken_catalog() -> Result<()> {
    let test = CliTest::with_file("app_de.ts", "<TS><context></TS>")?;
    test.write_file("strings.json", POWER_OFF_ONLY)?;

    let out = run(test.update_command(&["app_de.ts"], "strings.json"))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("Failed to parse catalog: app_de.ts"));
    assert_eq!(test.read_file("app_de.ts")?, "<TS><context></TS>");
    Ok(())
}

#[test]
fn test_update_empty_locale_writes_no_language() -> Result<()> {
    let test = CliTest::with_file("strings.json", POWER_OFF_ONLY)?;
    test.write_file(".tscatrc.json", r#"{ "sourceLanguage": "" }"#)?;

    let mut cmd = test.update_command(&["nls/messages.ts"], "strings.json");
    cmd.args(["--locale", ""]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    let catalog = test.read_file("nls/messages.ts")?;
    assert!(catalog.contains("<TS version=\"2.1\">"));

    // Reading the written catalog back finds nothing to change
    let out = run(test.update_command(&["nls/messages.ts"], "strings.json"))?;
    assert!(out.stdout.contains("All catalogs are up to date"));
    Ok(())
}

#[test]
fn test_update_verbose_logs_to_stderr() -> Result<()> {
    let test = CliTest::with_file("strings.json", POWER_OFF_ONLY)?;

    let mut cmd = test.update_command(&["nls/app_de.ts"], "strings.json");
    cmd.arg("-v");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stderr.contains("creating new catalog"));
    assert!(out.stderr.contains("nls/app_de.ts"));
    assert!(!out.stdout.contains("creating new catalog"));
    Ok(())
}
