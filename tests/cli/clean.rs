use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, pairs};

const SOURCE: &str = "{\n  \"03tpnc\": \"你好\"\n}\n";

#[test]
fn test_clean_removes_stale_keys() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/i18n/zh-cn.json", SOURCE),
        (
            "src/i18n/en.json",
            "{\n  \"03tpnc\": \"Hello\",\n  \"gone01\": \"Gone\"\n}\n",
        ),
    ])?;

    assert_cmd_snapshot!(test.clean_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Removed 1 key from 1 locale
    Removed 1 key from en (src/i18n/en.json)

    ----- stderr -----
    ");

    assert_eq!(
        test.read_file("src/i18n/en.json")?,
        "{\n  \"03tpnc\": \"Hello\"\n}\n"
    );

    Ok(())
}

#[test]
fn test_clean_nothing_to_do() -> Result<()> {
    let clean = "{\n  \"03tpnc\": \"Hello\"\n}\n";
    let test = CliTest::offline(&[
        ("src/i18n/zh-cn.json", SOURCE),
        ("src/i18n/en.json", clean),
    ])?;

    assert_cmd_snapshot!(test.command().arg("c"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Removed 0 keys from 0 locales

    ----- stderr -----
    ");

    assert_eq!(test.read_file("src/i18n/en.json")?, clean);

    Ok(())
}

#[test]
fn test_clean_with_target_override() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/i18n/zh-cn.json", SOURCE),
        ("src/i18n/en.json", "{\n  \"gone01\": \"Gone\"\n}\n"),
        ("src/i18n/ja.json", "{\n  \"gone01\": \"消えた\"\n}\n"),
    ])?;

    let output = test.clean_command().args(["--to", "ja"]).output()?;
    assert!(output.status.success());

    assert_eq!(test.read_locale("src/i18n/ja.json")?, pairs(&[]));
    assert_eq!(
        test.read_locale("src/i18n/en.json")?,
        pairs(&[("gone01", "Gone")])
    );

    Ok(())
}

#[test]
fn test_clean_without_source_keeps_targets() -> Result<()> {
    let target = "{\n  \"03tpnc\": \"Hello\",\n  \"gone01\": \"Gone\"\n}\n";
    let test = CliTest::offline(&[("src/i18n/en.json", target)])?;

    let output = test.clean_command().output()?;
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("persistence-failure"), "{}", stdout);

    assert_eq!(test.read_file("src/i18n/en.json")?, target);

    Ok(())
}
