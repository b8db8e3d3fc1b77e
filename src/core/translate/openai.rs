//! OpenAI-compatible chat-completions translator.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::translator::Translator;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Clone)]
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiTranslator {
    /// The key falls back to the `OPENAI_API_KEY` environment variable.
    pub fn new(api_key: Option<&str>, model: &str, base_url: Option<&str>) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key.to_string(),
            None => std::env::var(API_KEY_ENV).with_context(|| {
                format!(
                    "OpenAI translator needs 'apiKey' in the config or {} in the environment",
                    API_KEY_ENV
                )
            })?,
        };
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            model: model.to_string(),
            url: format!(
                "{}/chat/completions",
                base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/')
            ),
        })
    }

    async fn request(&self, text: &str, from: &str, to: &str, separator: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt(from, to, separator),
                },
                Message {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .context("Failed to send translation request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("OpenAI API error ({}): {}", status, body);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;
        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("OpenAI response contained no choices")
    }
}

impl Translator for OpenAiTranslator {
    fn name(&self) -> &str {
        "openai"
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

fn system_prompt(from: &str, to: &str, separator: &str) -> String {
    format!(
        "You are a software localization translator. Translate the user's text from \
         language code '{}' to language code '{}'. The text contains several UI strings \
         separated by lines reading {}. Keep every separator line exactly as it is, keep \
         the strings in the same order, keep placeholders and markup unchanged, and reply \
         with the translation only.",
        from,
        to,
        separator.trim()
    )
}
