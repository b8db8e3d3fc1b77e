use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, pairs};

#[test]
fn test_extract_dry_run_collects_keys() -> Result<()> {
    let test = CliTest::offline(&[("src/main.ts", "const a = \"你好\";\n")])?;

    assert_cmd_snapshot!(test.extract_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Extracted 1 key from 1 file
    Updated src/i18n/zh-cn.json
    Translated 1 key into en (src/i18n/en.json)

    ----- stderr -----
    ");

    // Sources are untouched without --rewrite
    assert_eq!(test.read_file("src/main.ts")?, "const a = \"你好\";\n");
    assert_eq!(
        test.read_locale("src/i18n/zh-cn.json")?,
        pairs(&[("03tpnc", "你好")])
    );
    // The empty translator seeds blank entries
    assert_eq!(test.read_locale("src/i18n/en.json")?, pairs(&[("03tpnc", "")]));

    Ok(())
}

#[test]
fn test_extract_rewrite_script() -> Result<()> {
    let test = CliTest::offline(&[("src/greeting.ts", "const greeting = \"你好世界\";\n")])?;

    let output = test
        .extract_command()
        .args(["--rewrite", "--no-translate"])
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Rewrote 1 file:\n  src/greeting.ts\n"), "{}", stdout);

    assert_eq!(
        test.read_file("src/greeting.ts")?,
        "import { $t } from \"@/i18n\";\nconst greeting = $t(\"qct472\");\n"
    );
    assert_eq!(
        test.read_locale("src/i18n/zh-cn.json")?,
        pairs(&[("qct472", "你好世界")])
    );

    Ok(())
}

#[test]
fn test_extract_rewrite_is_idempotent() -> Result<()> {
    let test = CliTest::offline(&[("src/App.vue", "<template><p>你好</p></template>")])?;

    test.extract_command()
        .args(["--rewrite", "--no-translate"])
        .output()?;
    assert_eq!(
        test.read_file("src/App.vue")?,
        "<template><p>{{ $t('03tpnc') }}</p></template>"
    );

    assert_cmd_snapshot!(test.extract_command().args(["--rewrite", "--no-translate"]), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Extracted 1 key from 1 file
    src/i18n/zh-cn.json is up to date

    ----- stderr -----
    ");

    assert_eq!(
        test.read_file("src/App.vue")?,
        "<template><p>{{ $t('03tpnc') }}</p></template>"
    );
    assert_eq!(
        test.read_locale("src/i18n/zh-cn.json")?,
        pairs(&[("03tpnc", "你好")])
    );

    Ok(())
}

#[test]
fn test_extract_dry_run_prunes_stale_source_keys() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/main.ts", "const a = \"你好\";\n"),
        ("src/i18n/zh-cn.json", "{\n  \"stale1\": \"旧的\"\n}\n"),
    ])?;

    test.extract_command().arg("--no-translate").output()?;

    assert_eq!(
        test.read_locale("src/i18n/zh-cn.json")?,
        pairs(&[("03tpnc", "你好")])
    );

    Ok(())
}

#[test]
fn test_extract_rewrite_keeps_existing_source_keys() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/main.ts", "const a = \"你好\";\n"),
        ("src/i18n/zh-cn.json", "{\n  \"older1\": \"旧的\"\n}\n"),
    ])?;

    test.extract_command()
        .args(["--rewrite", "--no-translate"])
        .output()?;

    assert_eq!(
        test.read_locale("src/i18n/zh-cn.json")?,
        pairs(&[("older1", "旧的"), ("03tpnc", "你好")])
    );

    Ok(())
}

#[test]
fn test_extract_cleans_target_locales() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/main.ts", "const a = \"你好\";\n"),
        (
            "src/i18n/en.json",
            "{\n  \"03tpnc\": \"Hello\",\n  \"gone01\": \"Gone\"\n}\n",
        ),
    ])?;

    let output = test.extract_command().arg("--no-translate").output()?;
    let stdout = String::from_utf8(output.stdout)?;
    assert!(
        stdout.contains("Removed 1 key from en (src/i18n/en.json)"),
        "{}",
        stdout
    );

    assert_eq!(
        test.read_locale("src/i18n/en.json")?,
        pairs(&[("03tpnc", "Hello")])
    );

    Ok(())
}

#[test]
fn test_extract_no_clean_leaves_targets() -> Result<()> {
    let stale = "{\n  \"gone01\": \"Gone\"\n}\n";
    let test = CliTest::offline(&[
        ("src/main.ts", "const a = \"你好\";\n"),
        ("src/i18n/en.json", stale),
    ])?;

    test.extract_command()
        .args(["--no-translate", "--no-clean"])
        .output()?;

    assert_eq!(test.read_file("src/i18n/en.json")?, stale);

    Ok(())
}

#[test]
fn test_extract_locale_overrides() -> Result<()> {
    let test = CliTest::offline(&[("app/main.js", "alert(\"你好\");\n")])?;
    test.write_file(
        ".i18nrc.json",
        r#"{
            "includePath": ["app/"],
            "translateInterval": 0,
            "translator": { "type": "empty" }
        }"#,
    )?;

    let output = test
        .extract_command()
        .args(["--to", "ja", "--output-path", "locales"])
        .output()?;
    assert!(output.status.success());

    assert_eq!(test.read_locale("locales/zh-cn.json")?, pairs(&[("03tpnc", "你好")]));
    assert_eq!(test.read_locale("locales/ja.json")?, pairs(&[("03tpnc", "")]));
    assert!(!test.root().join("locales/en.json").exists());

    Ok(())
}

#[test]
fn test_extract_respects_excluded_path() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/main.ts", "const a = \"你好\";\n"),
        ("src/legacy/old.ts", "const b = \"世界\";\n"),
    ])?;
    test.write_file(
        ".i18nrc.json",
        r#"{
            "excludedPath": ["src/legacy"],
            "autoTranslate": false,
            "translator": { "type": "empty" }
        }"#,
    )?;

    test.extract_command().output()?;

    assert_eq!(
        test.read_locale("src/i18n/zh-cn.json")?,
        pairs(&[("03tpnc", "你好")])
    );

    Ok(())
}

#[test]
fn test_extract_reports_parse_errors() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/bad.ts", "const = ;\n"),
        ("src/good.ts", "const a = \"你好\";\n"),
    ])?;

    let output = test
        .extract_command()
        .args(["--rewrite", "--no-translate"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("parse-error"), "{}", stdout);
    assert!(stdout.contains("--> src/bad.ts:1:"), "{}", stdout);
    assert!(stdout.contains("1 problems (1 error, 0 warnings)"), "{}", stdout);

    // The broken file is left alone, the rest is still processed
    assert_eq!(test.read_file("src/bad.ts")?, "const = ;\n");
    assert!(test.read_file("src/good.ts")?.contains("$t(\"03tpnc\")"));

    Ok(())
}

#[test]
fn test_extract_invalid_config() -> Result<()> {
    let test = CliTest::with_file(".i18nrc.json", "{ not json")?;

    let output = test.extract_command().output()?;
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.starts_with("Error: Failed to parse config file"), "{}", stderr);

    Ok(())
}
