use anyhow::Result;

use crate::{CliTest, HOST_RU, run};

const FILES_RU_TWO_FORMS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="ru">
<context>
    <name>Files</name>
    <message numerus="yes">
        <source>%n file(s)</source>
        <translation>
            <numerusform>%n файл</numerusform>
            <numerusform>%n файла</numerusform>
        </translation>
    </message>
</context>
</TS>
"#;

#[test]
fn test_validate_clean_catalog() -> Result<()> {
    let test = CliTest::with_file("nls/app_ru.ts", HOST_RU)?;

    let out = run(test.validate_command(&["nls/app_ru.ts"]))?;

    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(out.stdout.contains("2 message(s): 2 finished, 0 unfinished, 0 vanished"));
    assert!(out.stdout.contains("Checked 1 catalog - no issues found"));
    Ok(())
}

#[test]
fn test_validate_reports_plural_arity() -> Result<()> {
    let test = CliTest::with_file("app_ru.ts", FILES_RU_TWO_FORMS)?;

    let out = run(test.validate_command(&["app_ru.ts"]))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("error: Files::\"%n file(s)\"  plural-arity"));
    assert!(out.stdout.contains("--> app_ru.ts:6"));
    assert!(out.stdout.contains("has 2 form(s), locale 'ru' requires 3"));
    assert!(out.stdout.contains("1 problem"));
    Ok(())
}

#[test]
fn test_validate_plural_forms_override() -> Result<()> {
    let test = CliTest::with_file("app_ru.ts", FILES_RU_TWO_FORMS)?;
    test.write_file(".tscatrc.json", r#"{ "pluralForms": { "ru": 2 } }"#)?;

    let out = run(test.validate_command(&["app_ru.ts"]))?;

    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(out.stdout.contains("no issues found"));
    Ok(())
}

#[test]
fn test_validate_reports_duplicate_key() -> Result<()> {
    let test = CliTest::with_file(
        "app_de.ts",
        r#"<TS version="2.1" language="de">
<context>
    <name>Host</name>
    <message>
        <source>Open</source>
        <translation>Öffnen</translation>
    </message>
    <message>
        <source>Open</source>
        <translation>Öffnen</translation>
    </message>
</context>
</TS>
"#,
    )?;

    let out = run(test.validate_command(&["app_de.ts"]))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("duplicate-key"));
    assert!(out.stdout.contains("--> app_de.ts:8"));
    Ok(())
}

#[test]
fn test_validate_placeholder_mismatch_is_a_warning() -> Result<()> {
    let test = CliTest::with_file(
        "app_ru.ts",
        &HOST_RU.replace("Процессор №%u отсутствует", "Процессор отсутствует"),
    )?;

    let out = run(test.validate_command(&["app_ru.ts"]))?;

    assert_eq!(out.code, Some(0), "stdout: {}", out.stdout);
    assert!(
        out.stdout
            .contains("warning: Host::\"CPU no.%u is not present\"  placeholder-mismatch")
    );
    assert!(out.stdout.contains("missing %u"));
    assert!(!out.stdout.contains("no issues found"));
    Ok(())
}

#[test]
fn test_validate_malformed_catalog() -> Result<()> {
    let test = CliTest::with_file("app_de.ts", "<TS><context></TS>")?;

    let out = run(test.validate_command(&["app_de.ts"]))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("malformed-catalog"));
    Ok(())
}

#[test]
fn test_validate_missing_catalog_is_an_error() -> Result<()> {
    let test = CliTest::new()?;

    let out = run(test.validate_command(&["nls/app_fr.ts"]))?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Failed to read catalog: nls/app_fr.ts"));
    Ok(())
}

#[test]
fn test_validate_without_catalogs() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("validate");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("No catalogs given"));
    Ok(())
}

#[test]
fn test_validate_verbose_logs_structural_errors() -> Result<()> {
    let test = CliTest::with_file("app_ru.ts", FILES_RU_TWO_FORMS)?;

    let mut cmd = test.validate_command(&["app_ru.ts"]);
    cmd.arg("--verbose");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("catalog has structural errors"));
    Ok(())
}

#[test]
fn test_validate_crlf_catalog() -> Result<()> {
    let test = CliTest::with_file("app_ru.ts", &FILES_RU_TWO_FORMS.replace('\n', "\r\n"))?;

    let out = run(test.validate_command(&["app_ru.ts"]))?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("--> app_ru.ts:6"));
    assert!(out.stdout.contains("6 |     <message numerus=\"yes\">"));
    Ok(())
}
