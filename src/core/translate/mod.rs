//! Machine translation of the source locale into target locales.
//!
//! Missing entries of each target locale are packed into chunks, sent to the
//! translator concurrently (subject to the translator's own interval), split
//! back, aligned with their keys and merged into the locale file. Locales are
//! processed one after another with `translateInterval` between them.

pub mod baidu;
pub mod empty;
pub mod google;
pub mod openai;
pub mod splitter;
pub mod translator;
pub mod youdao;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use tracing::{info, warn};

use self::baidu::BaiduTranslator;
use self::empty::EmptyTranslator;
use self::google::GoogleTranslator;
use self::openai::OpenAiTranslator;
use self::splitter::{SEPARATOR, align, create_text_splitter, split_translation};
use self::translator::{Dispatcher, SharedTranslator};
use self::youdao::YoudaoTranslator;
use super::aggregate::I18nMap;
use super::store::{read_locale_or_default, write_locale};
use crate::config::{ExtractionOptions, TranslatorConfig};
use crate::issues::{
    Issue, PersistenceFailureIssue, TranslationMismatchIssue, TranslatorFailureIssue,
};

/// Hook applied to every translated text before it is stored.
pub trait PostProcessor: Send + Sync {
    fn process(&self, text: String, lang: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPostProcessor;

impl PostProcessor for NoopPostProcessor {
    fn process(&self, text: String, _lang: &str) -> String {
        text
    }
}

/// Adapter for closure-based post-processing.
pub struct FnPostProcessor<F>(pub F);

impl<F> PostProcessor for FnPostProcessor<F>
where
    F: Fn(String, &str) -> String + Send + Sync,
{
    fn process(&self, text: String, lang: &str) -> String {
        (self.0)(text, lang)
    }
}

/// Called once for every failed translator request.
pub type ErrorHandler = Arc<dyn Fn(&TranslatorFailureIssue) + Send + Sync>;

fn default_error_handler() -> ErrorHandler {
    Arc::new(|issue: &TranslatorFailureIssue| {
        warn!(
            translator = %issue.translator,
            lang = %issue.lang,
            "translation request failed: {}",
            issue.error
        );
    })
}

/// Build the translator described by the configuration.
pub fn translator_from_config(config: &TranslatorConfig) -> Result<SharedTranslator> {
    Ok(match config {
        TranslatorConfig::Google { proxy, base_url } => Arc::new(GoogleTranslator::new(
            proxy.as_deref(),
            base_url.as_deref(),
        )?),
        TranslatorConfig::Openai {
            api_key,
            model,
            base_url,
        } => Arc::new(OpenAiTranslator::new(
            api_key.as_deref(),
            model,
            base_url.as_deref(),
        )?),
        TranslatorConfig::Baidu {
            app_id,
            app_key,
            proxy,
            base_url,
            interval,
        } => Arc::new(BaiduTranslator::new(
            app_id,
            app_key,
            proxy.as_deref(),
            base_url.as_deref(),
            Duration::from_millis(*interval),
        )?),
        TranslatorConfig::Youdao {
            app_id,
            app_key,
            proxy,
            base_url,
            interval,
        } => Arc::new(YoudaoTranslator::new(
            app_id,
            app_key,
            proxy.as_deref(),
            base_url.as_deref(),
            Duration::from_millis(*interval),
        )?),
        TranslatorConfig::Empty => Arc::new(EmptyTranslator),
    })
}

/// One target locale that received translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedLocale {
    pub lang: String,
    pub path: PathBuf,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct TranslateReport {
    pub translated: Vec<TranslatedLocale>,
    /// Locales that had nothing to translate.
    pub up_to_date: Vec<String>,
    pub issues: Vec<Issue>,
}

impl TranslateReport {
    pub fn translated_count(&self) -> usize {
        self.translated.iter().map(|t| t.count).sum()
    }
}

pub struct Orchestrator {
    dispatcher: Dispatcher,
    post_processor: Arc<dyn PostProcessor>,
    error_handler: ErrorHandler,
    locale_interval: Duration,
}

impl Orchestrator {
    pub fn new(translator: SharedTranslator) -> Self {
        Self {
            dispatcher: Dispatcher::new(translator),
            post_processor: Arc::new(NoopPostProcessor),
            error_handler: default_error_handler(),
            locale_interval: Duration::ZERO,
        }
    }

    /// Orchestrator with the configured translator and locale interval.
    pub fn from_options(options: &ExtractionOptions) -> Result<Self> {
        let translator = translator_from_config(&options.translator)?;
        Ok(Self::new(translator).with_locale_interval(Duration::from_millis(
            options.translate_interval,
        )))
    }

    pub fn with_post_processor(mut self, post_processor: Arc<dyn PostProcessor>) -> Self {
        self.post_processor = post_processor;
        self
    }

    pub fn with_error_handler(mut self, error_handler: ErrorHandler) -> Self {
        self.error_handler = error_handler;
        self
    }

    pub fn with_locale_interval(mut self, interval: Duration) -> Self {
        self.locale_interval = interval;
        self
    }

    pub fn translator_name(&self) -> &str {
        self.dispatcher.translator().name()
    }

    /// Fill in every target locale from `source`.
    ///
    /// Keys missing from a locale, or present with an empty value, are
    /// translated; existing translations are never overwritten.
    pub async fn translate_locales(
        &self,
        source: &I18nMap,
        options: &ExtractionOptions,
        root: &Path,
    ) -> TranslateReport {
        let mut report = TranslateReport::default();
        let mut translated_any = false;

        for lang in &options.translate_lang_keys {
            let path = options.lang_json_path(root, lang);
            let mut target = read_locale_or_default(&path);

            let (keys, texts): (Vec<&String>, Vec<&String>) = source
                .iter()
                .filter(|(key, _)| target.get(*key).is_none_or(|value| value.is_empty()))
                .unzip();
            if keys.is_empty() {
                info!(lang = %lang, "nothing to translate");
                report.up_to_date.push(lang.clone());
                continue;
            }

            if translated_any && !self.locale_interval.is_zero() {
                tokio::time::sleep(self.locale_interval).await;
            }
            translated_any = true;

            info!(
                lang = %lang,
                count = keys.len(),
                translator = self.translator_name(),
                "translating"
            );
            let (values, issues) = self.translate_texts(&texts, &options.from_lang, lang).await;
            report.issues.extend(issues);

            let count = keys.len();
            target.extend(keys.into_iter().cloned().zip(values));

            match write_locale(&path, &target) {
                Ok(()) => report.translated.push(TranslatedLocale {
                    lang: lang.clone(),
                    path,
                    count,
                }),
                Err(err) => {
                    warn!(lang = %lang, "{:#}", err);
                    report
                        .issues
                        .push(Issue::PersistenceFailure(PersistenceFailureIssue {
                            path: path.display().to_string(),
                            lang: Some(lang.clone()),
                            error: format!("{:#}", err),
                        }));
                }
            }
        }

        report
    }

    /// Translate `texts` from `from` to `to`, one result per text.
    ///
    /// Failed requests yield empty strings for their texts.
    pub async fn translate_texts<S: AsRef<str>>(
        &self,
        texts: &[S],
        from: &str,
        to: &str,
    ) -> (Vec<String>, Vec<Issue>) {
        let chunks = create_text_splitter(texts, self.dispatcher.translator().max_chunk_size());
        let results = join_all(
            chunks
                .iter()
                .map(|chunk| self.dispatcher.dispatch(&chunk.text, from, to, SEPARATOR)),
        )
        .await;

        let mut values = Vec::with_capacity(texts.len());
        let mut issues = Vec::new();
        for (chunk, result) in chunks.iter().zip(results) {
            match result {
                Ok(text) => {
                    let pieces = split_translation(&text, to, self.post_processor.as_ref());
                    if pieces.len() != chunk.count {
                        warn!(
                            lang = %to,
                            expected = chunk.count,
                            actual = pieces.len(),
                            "translation count mismatch"
                        );
                        issues.push(Issue::TranslationMismatch(TranslationMismatchIssue {
                            lang: to.to_string(),
                            expected: chunk.count,
                            actual: pieces.len(),
                        }));
                    }
                    values.extend(align(pieces, chunk.count));
                }
                Err(err) => {
                    let issue = TranslatorFailureIssue {
                        translator: self.translator_name().to_string(),
                        lang: to.to_string(),
                        error: format!("{:#}", err),
                    };
                    (self.error_handler)(&issue);
                    issues.push(Issue::TranslatorFailure(issue));
                    values.extend(std::iter::repeat_n(String::new(), chunk.count));
                }
            }
        }

        (values, issues)
    }
}
