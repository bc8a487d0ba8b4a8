use anyhow::Result;

use crate::{CliTest, HOST_RU, run};

fn host_ru_with_vanished() -> String {
    HOST_RU.replace(
        "<translation>Выключить</translation>",
        r#"<translation type="vanished">Выключить</translation>"#,
    )
}

#[test]
fn test_prune_removes_vanished_messages() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", &host_ru_with_vanished())?;
    test.write_file("nls/app_de.ts", &HOST_RU.replace("language=\"ru\"", "language=\"de\""))?;

    let out = run(test.prune_command(&["nls/app_ru.ts", "nls/app_de.ts"]))?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Pruning 'nls/app_ru.ts'... 1 obsolete message(s)"));
    assert!(out.stdout.contains("  - Host::\"Power off\""));
    assert!(!out.stdout.contains("Pruning 'nls/app_de.ts'"));
    assert!(out.stdout.contains("Removed 1 message(s) from 1 catalog(s)"));

    let catalog = test.read_file("nls/app_ru.ts")?;
    assert!(!catalog.contains("Power off"));
    assert!(catalog.contains("CPU no.%u is not present"));
    // Untouched catalogs keep their bytes
    assert_eq!(
        test.read_file("nls/app_de.ts")?,
        HOST_RU.replace("language=\"ru\"", "language=\"de\"")
    );
    Ok(())
}

#[test]
fn test_prune_drops_emptied_context() -> Result<()> {
    let test = CliTest::with_file(
        "app_de.ts",
        r#"<TS version="2.1" language="de">
<context>
    <name>Legacy</name>
    <message>
        <source>Old</source>
        <translation type="vanished">Alt</translation>
    </message>
</context>
</TS>
"#,
    )?;

    let out = run(test.prune_command(&["app_de.ts"]))?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("  - context Legacy (now empty)"));
    assert!(!test.read_file("app_de.ts")?.contains("<context>"));
    Ok(())
}

#[test]
fn test_prune_dry_run() -> Result<()> {
    let content = host_ru_with_vanished();
    let test = CliTest::with_file("app_ru.ts", &content)?;

    let mut cmd = test.prune_command(&["app_ru.ts"]);
    cmd.arg("--dry-run");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("Would remove 1 message(s) from 1 catalog(s)."));
    assert_eq!(test.read_file("app_ru.ts")?, content);
    Ok(())
}

#[test]
fn test_prune_nothing_to_remove() -> Result<()> {
    let test = CliTest::with_file("app_ru.ts", HOST_RU)?;

    let out = run(test.prune_command(&["app_ru.ts"]))?;

    assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
    assert!(out.stdout.contains("No obsolete messages found"));
    assert_eq!(test.read_file("app_ru.ts")?, HOST_RU);
    Ok(())
}

#[test]
fn test_prune_broken_catalog_blocks_all_writes() -> Result<()> {
    let content = host_ru_with_vanished();
    let test = CliTest::with_file("app_ru.ts", &content)?;
    test.write_file("app_de.ts", "<TS><context></TS>")?;

    let out = run(test.prune_command(&["app_ru.ts", "app_de.ts"]))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("Failed to parse catalog: app_de.ts"));
    assert!(out.stdout.contains("no catalog was written"));
    assert_eq!(test.read_file("app_ru.ts")?, content);
    Ok(())
}
