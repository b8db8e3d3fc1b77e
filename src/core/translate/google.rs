//! Google Translate through the free `gtx` web endpoint.
//!
//! No key is needed, but the endpoint is unofficial and may be unreachable
//! from some networks; a proxy can be configured for that case.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::translator::Translator;

pub const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(proxy: Option<&str>, base_url: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
        if let Some(proxy) = proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .with_context(|| format!("Invalid translator proxy: {}", proxy))?;
            builder = builder.proxy(proxy);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    async fn request(&self, text: &str, from: &str, to: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/translate_a/single", self.base_url))
            .query(&[
                ("client", "gtx"),
                ("sl", google_lang(from).as_str()),
                ("tl", google_lang(to).as_str()),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .context("Failed to send request to Google Translate")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("Google Translate error ({}): {}", status, body);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse Google Translate response")?;
        parse_response(&body)
    }
}

impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
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

/// Google uses region subtags in upper case (`zh-CN`).
fn google_lang(lang: &str) -> String {
    match lang.split_once('-') {
        Some((language, region)) => format!("{}-{}", language, region.to_uppercase()),
        None => lang.to_string(),
    }
}

/// The response is `[[["translated", "source", ...], ...], ...]`; the
/// translated segments are concatenated.
fn parse_response(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .context("Google Translate response has no translation segments")?;
    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_google_lang() {
        assert_eq!(google_lang("zh-cn"), "zh-CN");
        assert_eq!(google_lang("zh-tw"), "zh-TW");
        assert_eq!(google_lang("en"), "en");
    }

    #[test]
    fn test_parse_response_joins_segments() {
        let body = json!([[["Hello\n", "你好\n", null], ["World", "世界", null]], null, "zh-CN"]);
        assert_eq!(parse_response(&body).unwrap(), "Hello\nWorld");
        assert!(parse_response(&json!({})).is_err());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate_a/single"))
            .and(query_param("sl", "zh-CN"))
            .and(query_param("tl", "en"))
            .and(body_string_contains("q="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[["Hello", "你好"]]])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let translator = GoogleTranslator::new(None, Some(&mock_server.uri())).unwrap();
        let result = translator.fetch("你好", "zh-cn", "en", "\n").await.unwrap();
        assert_eq!(result, "Hello");
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&mock_server)
            .await;

        let translator = GoogleTranslator::new(None, Some(&mock_server.uri())).unwrap();
        let err = translator.fetch("你好", "zh-cn", "en", "\n").await.unwrap_err();
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_invalid_proxy() {
        assert!(GoogleTranslator::new(Some("not a url"), None).is_err());
    }
}
