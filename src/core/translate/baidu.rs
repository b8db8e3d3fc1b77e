//! Baidu Translate general text API.
//!
//! Requests are signed with `md5(appid + q + salt + key)`. Baidu translates
//! line by line and answers with one entry per source line.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures::FutureExt;
use futures::future::BoxFuture;
use md5::{Digest, Md5};
use serde::Deserialize;
use serde_json::Value;

use super::translator::{Translator, unix_millis};

pub const DEFAULT_BASE_URL: &str = "https://fanyi-api.baidu.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Returned alongside results on success by some API versions.
const SUCCESS_CODE: &str = "52000";

#[derive(Debug, Clone)]
pub struct BaiduTranslator {
    client: reqwest::Client,
    app_id: String,
    app_key: String,
    url: String,
    interval: Duration,
}

impl BaiduTranslator {
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
                "{}/api/trans/vip/translate",
                base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/')
            ),
            interval,
        })
    }

    async fn request(&self, text: &str, from: &str, to: &str, separator: &str) -> Result<String> {
        let salt = unix_millis().to_string();
        let sign = sign(&self.app_id, text, &salt, &self.app_key);
        let response = self
            .client
            .post(&self.url)
            .form(&[
                ("q", text),
                ("appid", self.app_id.as_str()),
                ("from", baidu_lang(from)),
                ("to", baidu_lang(to)),
                ("salt", salt.as_str()),
                ("sign", sign.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Baidu Translate")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("Baidu Translate error ({}): {}", status, body);
        }

        let body: BaiduResponse = response
            .json()
            .await
            .context("Failed to parse Baidu Translate response")?;
        body.into_text(separator)
    }
}

impl Translator for BaiduTranslator {
    fn name(&self) -> &str {
        "baidu"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn fetch<'a>(
        &'a self,
        text: &'a str,
        from: &'a str,
        to: &'a str,
        separator: &'a str,
    ) -> BoxFuture<'a, Result<String>> {
        self.request(text, from, to, separator).boxed()
    }
}

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    /// A string on most errors, a number on a few.
    #[serde(default)]
    error_code: Option<Value>,
    #[serde(default)]
    error_msg: Option<String>,
    #[serde(default)]
    trans_result: Vec<TransResult>,
}

#[derive(Debug, Deserialize)]
struct TransResult {
    src: String,
    dst: String,
}

impl BaiduResponse {
    /// Join the per-line results back together. Separator lines are taken
    /// from the source so a translated separator mark cannot break the split.
    fn into_text(self, separator: &str) -> Result<String> {
        if let Some(code) = &self.error_code {
            let code = match code {
                Value::String(code) => code.clone(),
                other => other.to_string(),
            };
            if code != SUCCESS_CODE {
                bail!(
                    "Baidu Translate error {}: {}",
                    code,
                    self.error_msg.as_deref().unwrap_or("unknown error")
                );
            }
        }
        let mark = separator.trim();
        Ok(self
            .trans_result
            .into_iter()
            .map(|line| {
                if !mark.is_empty() && line.src.trim() == mark {
                    mark.to_string()
                } else {
                    line.dst
                }
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn sign(app_id: &str, text: &str, salt: &str, app_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(app_id.as_bytes());
    hasher.update(text.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(app_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Baidu uses its own codes for a few languages.
fn baidu_lang(lang: &str) -> &str {
    match lang {
        "zh-cn" => "zh",
        "zh-tw" => "cht",
        "ja" => "jp",
        "ko" => "kor",
        "fr" => "fra",
        "es" => "spa",
        "vi" => "vie",
        "ar" => "ara",
        other => other,
    }
}
