use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{CliTest, pairs};

const SOURCE: &str = "{\n  \"03tpnc\": \"你好\",\n  \"03tp3z\": \"世界\"\n}\n";

#[test]
fn test_translate_fills_missing_entries() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/i18n/zh-cn.json", SOURCE),
        ("src/i18n/en.json", "{\n  \"03tpnc\": \"Hello\"\n}\n"),
    ])?;

    assert_cmd_snapshot!(test.translate_command(), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Translated 1 key into 1 locale
    Translated 1 key into en (src/i18n/en.json)

    ----- stderr -----
    ");

    assert_eq!(
        test.read_locale("src/i18n/en.json")?,
        pairs(&[("03tpnc", "Hello"), ("03tp3z", "")])
    );

    Ok(())
}

#[test]
fn test_translate_alias_and_up_to_date() -> Result<()> {
    let test = CliTest::offline(&[
        ("src/i18n/zh-cn.json", SOURCE),
        (
            "src/i18n/en.json",
            "{\n  \"03tpnc\": \"Hello\",\n  \"03tp3z\": \"World\"\n}\n",
        ),
    ])?;

    assert_cmd_snapshot!(test.command().arg("t"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Translated 0 keys into 0 locales
    Up to date: en

    ----- stderr -----
    ");

    Ok(())
}

#[test]
fn test_translate_without_source_locale() -> Result<()> {
    let test = CliTest::offline(&[])?;

    let output = test.translate_command().output()?;
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.starts_with("Error: Source locale not found:"), "{}", stderr);
    assert!(stderr.contains("(run `extract` first)"), "{}", stderr);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_translate_with_google_backend() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate_a/single"))
        .and(query_param("sl", "zh-CN"))
        .and(query_param("tl", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            ["Hello\n┇┇┇\n", "你好\n┇┇┇\n"],
            ["World", "世界"]
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    let test = CliTest::with_file("src/i18n/zh-cn.json", SOURCE)?;
    test.write_file(
        ".i18nrc.json",
        &format!(
            r#"{{
                "translateLangKeys": ["en"],
                "translator": {{ "type": "google", "baseUrl": "{}" }}
            }}"#,
            server.uri()
        ),
    )?;

    let output = test.translate_command().output()?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(
        test.read_locale("src/i18n/en.json")?,
        pairs(&[("03tpnc", "Hello"), ("03tp3z", "World")])
    );

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_translate_backend_failure_is_reported() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&server)
        .await;

    let test = CliTest::with_file("src/i18n/zh-cn.json", SOURCE)?;
    test.write_file(
        ".i18nrc.json",
        &format!(
            r#"{{
                "translateLangKeys": ["en"],
                "translator": {{ "type": "google", "baseUrl": "{}" }}
            }}"#,
            server.uri()
        ),
    )?;

    let output = test.translate_command().output()?;
    // Translator failures are warnings
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("translator-failure"), "{}", stdout);
    assert!(stdout.contains("--> locale en"), "{}", stdout);

    // Failed batches are written as blanks so the next run retries them
    assert_eq!(
        test.read_locale("src/i18n/en.json")?,
        pairs(&[("03tpnc", ""), ("03tp3z", "")])
    );

    Ok(())
}
