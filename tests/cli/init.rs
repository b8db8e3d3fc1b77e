use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["translateKey", "fromLang", "translateLangKeys", "outputPath", "translator"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["fromLang"], "zh-cn");
    assert_eq!(parsed["translator"]["type"], "google");

    assert!(
        content.contains("\n  \"translateKey\""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .i18nrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".i18nrc.json").exists());
    let content = test.read_file(".i18nrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".i18nrc.json", "{}")?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: false
    exit_code: 1
    ----- stdout -----
    ✘ .i18nrc.json already exists

    ----- stderr -----
    ");

    assert_eq!(test.read_file(".i18nrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("src/main.ts", "const a = \"你好\";\n")?;

    let output = test.extract_command().arg("--no-translate").output()?;
    assert!(
        output.status.success(),
        "Extract should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(test.root().join("src/i18n/zh-cn.json").exists());

    Ok(())
}
