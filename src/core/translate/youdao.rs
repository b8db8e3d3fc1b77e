//! Youdao text translation API with v3 (SHA-256) request signing.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::translator::{Translator, unix_millis};

pub const DEFAULT_BASE_URL: &str = "https://openapi.youdao.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct YoudaoTranslator {
    client: reqwest::Client,
    app_id: String,
    app_key: String,
    url: String,
    interval: Duration,
}

impl YoudaoTranslator {
    pub fn new(
        app_id: &str,
        app_key: &str,
        proxy: Option<&str>,
        base_url: Option<&str>,
        interval: Duration,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .with_context(|| format!("Invalid translator proxy: {}", proxy))?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            app_id: app_id.to_string(),
            app_key: app_key.to_string(),
            url: format!(
                "{}/api",
                base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/')
            ),
            interval,
        })
    }

    async fn request(&self, text: &str, from: &str, to: &str) -> Result<String> {
        let millis = unix_millis();
        let salt = millis.to_string();
        let curtime = (millis / 1000).to_string();
        let sign = sign(&self.app_id, text, &salt, &curtime, &self.app_key);
        let response = self
            .client
            .post(&self.url)
            .form(&[
                ("q", text),
                ("appKey", self.app_id.as_str()),
                ("salt", salt.as_str()),
                ("from", youdao_lang(from)),
                ("to", youdao_lang(to)),
                ("sign", sign.as_str()),
                ("signType", "v3"),
                ("curtime", curtime.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Youdao")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("Youdao error ({}): {}", status, body);
        }

        let body: YoudaoResponse = response
            .json()
            .await
            .context("Failed to parse Youdao response")?;
        if body.error_code != "0" {
            bail!("Youdao error code {}", body.error_code);
        }
        body.translation
            .into_iter()
            .next()
            .context("Youdao response contained no translation")
    }
}

impl Translator for YoudaoTranslator {
    fn name(&self) -> &str {
        "youdao"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn fetch<'a>(
        &'a self,
        text: &'a str,
        from: &'a str,
        to: &'a str,
        _separator: &'a str,
    ) -> BoxFuture<'a, Result<String>> {
        self.request(text, from, to).boxed()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YoudaoResponse {
    error_code: String,
    #[serde(default)]
    translation: Vec<String>,
}

/// `sha256(appKey + input + salt + curtime + appSecret)`, hex encoded.
fn sign(app_id: &str, text: &str, salt: &str, curtime: &str, app_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(app_id.as_bytes());
    hasher.update(signature_input(text).as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(curtime.as_bytes());
    hasher.update(app_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Texts over 20 characters are signed as first 10 + length + last 10.
fn signature_input(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 20 {
        return text.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 10..].iter().collect();
    format!("{}{}{}", head, chars.len(), tail)
}

fn youdao_lang(lang: &str) -> &str {
    match lang {
        "zh-cn" => "zh-CHS",
        "zh-tw" => "zh-CHT",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::translate::splitter::SEPARATOR;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn translator(server: &MockServer) -> YoudaoTranslator {
        YoudaoTranslator::new("app", "secret", None, Some(&server.uri()), Duration::ZERO).unwrap()
    }

    #[test]
    fn test_signature_input_truncates_long_text() {
        assert_eq!(signature_input("你好"), "你好");
        assert_eq!(signature_input(&"一".repeat(20)), "一".repeat(20));
        let long = format!("{}{}{}", "甲".repeat(10), "中间部分", "乙".repeat(10));
        assert_eq!(
            signature_input(&long),
            format!("{}24{}", "甲".repeat(10), "乙".repeat(10))
        );
    }

    #[test]
    fn test_sign_is_sha256_of_concatenation() {
        // sha256("abc")
        assert_eq!(
            sign("a", "b", "c", "", ""),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_youdao_lang() {
        assert_eq!(youdao_lang("zh-cn"), "zh-CHS");
        assert_eq!(youdao_lang("zh-tw"), "zh-CHT");
        assert_eq!(youdao_lang("en"), "en");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .and(body_string_contains("appKey=app"))
            .and(body_string_contains("from=zh-CHS"))
            .and(body_string_contains("to=en"))
            .and(body_string_contains("signType=v3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorCode": "0",
                "translation": ["Hello\n┇┇┇\nWorld"]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = translator(&mock_server)
            .fetch("你好\n┇┇┇\n世界", "zh-cn", "en", SEPARATOR)
            .await
            .unwrap();
        assert_eq!(result, "Hello\n┇┇┇\nWorld");
    }

    #[tokio::test]
    async fn test_fetch_error_code() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errorCode": "202" })))
            .mount(&mock_server)
            .await;

        let err = translator(&mock_server)
            .fetch("你好", "zh-cn", "en", SEPARATOR)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("202"), "{}", err);
    }
}
