//! Host build integration.
//!
//! A [`TransformSession`] is what a bundler plugin drives: it receives one
//! module at a time, returns the rewritten code and accumulates the keys. In
//! watch mode every transform schedules a debounced write of the source
//! locale.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::warn;

use super::aggregate::Aggregator;
use super::debounce::Debouncer;
use super::engine::Engine;
use super::file_scanner::is_scannable;
use super::pipeline::{PostReport, translate_and_clean};
use super::store::{WriteResult, read_locale_or_default, write_source_locale};
use crate::config::ExtractionOptions;
use crate::issues::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// One-shot production build.
    Build,
    /// Dev server: modules are transformed repeatedly.
    Watch,
}

#[derive(Debug, Default)]
pub struct SessionReport {
    pub source: Option<WriteResult>,
    pub post: PostReport,
}

pub struct TransformSession {
    options: Arc<ExtractionOptions>,
    root: PathBuf,
    engine: Engine,
    aggregator: Arc<Aggregator>,
    debouncer: Option<Debouncer>,
    /// Owned only when the session was created outside a tokio runtime.
    runtime: Option<Runtime>,
}

impl TransformSession {
    pub fn new(options: ExtractionOptions, root: impl Into<PathBuf>, mode: SessionMode) -> Result<Self> {
        let root = root.into();
        let source_path = options.lang_json_path(&root, &options.from_lang);
        let engine = Engine::new(options.clone())?
            .with_known_keys(read_locale_or_default(&source_path))
            .with_code_output(true);

        let (debouncer, runtime) = if mode == SessionMode::Watch && options.output_json_in_plugin {
            let delay = Duration::from_millis(options.output_json_debounce_ms);
            match Handle::try_current() {
                Ok(handle) => (Some(Debouncer::new(delay, handle)), None),
                Err(_) => {
                    let runtime = Builder::new_multi_thread()
                        .worker_threads(1)
                        .enable_time()
                        .build()
                        .context("Failed to start the flush runtime")?;
                    let debouncer = Debouncer::new(delay, runtime.handle().clone());
                    (Some(debouncer), Some(runtime))
                }
            }
        } else {
            (None, None)
        };

        Ok(Self {
            options: Arc::new(options),
            root,
            engine,
            aggregator: Arc::new(Aggregator::new()),
            debouncer,
            runtime,
        })
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Transform one module.
    ///
    /// Returns `None` when the file is filtered out or nothing changed. Parse
    /// failures are logged and leave the module untouched so the host build
    /// keeps going.
    pub fn transform(&self, code: &str, path: &Path) -> Result<Option<String>> {
        if !self.options.enabled
            || !is_scannable(&self.root, path, &self.options)
            || self.is_output_file(path)
        {
            return Ok(None);
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let outcome = self.engine.transform_file(code, relative);
        for issue in &outcome.issues {
            warn!(file = %relative.display(), rule = %issue.report_rule(), "{}", issue.message());
        }
        self.aggregator.merge(outcome.map);

        if let Some(debouncer) = &self.debouncer {
            let aggregator = Arc::clone(&self.aggregator);
            let options = Arc::clone(&self.options);
            let root = self.root.clone();
            debouncer.call(move || {
                if let Err(err) = write_snapshot(&aggregator, &options, &root) {
                    warn!("{:#}", err);
                }
            });
        }

        Ok(outcome.code)
    }

    /// Write the keys seen so far to the source locale now.
    pub fn flush(&self) -> Result<Option<WriteResult>> {
        if let Some(debouncer) = &self.debouncer {
            debouncer.cancel();
        }
        write_snapshot(&self.aggregator, &self.options, &self.root)
    }

    /// End of a build: flush, then translate and prune as configured.
    pub async fn finish(&self) -> Result<SessionReport> {
        let source = self.flush()?;
        let post = match &source {
            Some(written) => translate_and_clean(&self.options, &self.root, &written.data).await?,
            None => PostReport::default(),
        };
        Ok(SessionReport { source, post })
    }

    fn is_output_file(&self, path: &Path) -> bool {
        let output = self.root.join(&self.options.output_path);
        path.starts_with(&output) || self.root.join(path).starts_with(&output)
    }

    #[cfg(test)]
    fn has_pending_flush(&self) -> bool {
        self.debouncer.as_ref().is_some_and(Debouncer::is_pending)
    }
}

impl Drop for TransformSession {
    fn drop(&mut self) {
        if let Some(debouncer) = &self.debouncer {
            debouncer.cancel();
        }
        // A blocking shutdown panics when the last owner drops inside async code.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Additive write: the session only knows the modules it has seen, so
/// nothing is pruned.
fn write_snapshot(
    aggregator: &Aggregator,
    options: &ExtractionOptions,
    root: &Path,
) -> Result<Option<WriteResult>> {
    let map = aggregator.snapshot();
    if map.is_empty() {
        return Ok(None);
    }
    let path = options.lang_json_path(root, &options.from_lang);
    write_source_locale(&map, &path, true).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslatorConfig;
    use crate::core::aggregate::I18nMap;
    use crate::core::store::{read_locale, write_locale};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn options() -> ExtractionOptions {
        ExtractionOptions {
            translator: TranslatorConfig::Empty,
            translate_lang_keys: vec!["en".to_string()],
            translate_interval: 0,
            output_json_debounce_ms: 500,
            ..Default::default()
        }
    }

    fn map(entries: &[(&str, &str)]) -> I18nMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn transform_returns_code_without_import() {
        let dir = tempdir().unwrap();
        let session = TransformSession::new(options(), dir.path(), SessionMode::Build).unwrap();

        let code = session
            .transform("const a = \"你好\";", &dir.path().join("src/a.ts"))
            .unwrap();

        assert_eq!(code.as_deref(), Some("const a = $t(\"03tpnc\");"));
        assert_eq!(session.aggregator().snapshot(), map(&[("03tpnc", "你好")]));
    }

    #[test]
    fn filtered_files_are_untouched() {
        let dir = tempdir().unwrap();
        let session = TransformSession::new(options(), dir.path(), SessionMode::Build).unwrap();
        let code = "const a = \"你好\";";

        for path in [
            "lib/a.ts",
            "src/style.css",
            "node_modules/pkg/index.js",
            "src/i18n/index.ts",
        ] {
            assert_eq!(session.transform(code, &dir.path().join(path)).unwrap(), None);
        }
        assert!(session.aggregator().is_empty());
    }

    #[test]
    fn disabled_session_does_nothing() {
        let dir = tempdir().unwrap();
        let options = ExtractionOptions {
            enabled: false,
            ..options()
        };
        let session = TransformSession::new(options, dir.path(), SessionMode::Build).unwrap();
        let result = session
            .transform("const a = \"你好\";", &dir.path().join("src/a.ts"))
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn flush_merges_additively() {
        let dir = tempdir().unwrap();
        let opts = options();
        let source_path = opts.lang_json_path(dir.path(), "zh-cn");
        write_locale(&source_path, &map(&[("old123", "旧的")])).unwrap();

        let session = TransformSession::new(opts, dir.path(), SessionMode::Build).unwrap();
        session
            .transform("const a = \"你好\";", &dir.path().join("src/a.ts"))
            .unwrap();
        let written = session.flush().unwrap().unwrap();

        assert!(written.has_diff);
        assert_eq!(
            read_locale(&source_path).unwrap(),
            map(&[("old123", "旧的"), ("03tpnc", "你好")])
        );
    }

    #[test]
    fn flush_without_keys_writes_nothing() {
        let dir = tempdir().unwrap();
        let session = TransformSession::new(options(), dir.path(), SessionMode::Build).unwrap();
        assert!(session.flush().unwrap().is_none());
        assert!(!options().lang_json_path(dir.path(), "zh-cn").exists());
    }

    #[tokio::test]
    async fn finish_translates_target_locales() {
        let dir = tempdir().unwrap();
        let opts = options();
        let session = TransformSession::new(opts.clone(), dir.path(), SessionMode::Build).unwrap();
        session
            .transform("const a = \"你好\";", &dir.path().join("src/a.ts"))
            .unwrap();

        let report = session.finish().await.unwrap();

        assert!(report.source.is_some());
        assert_eq!(report.post.translate.unwrap().translated_count(), 1);
        assert_eq!(
            read_locale(&opts.lang_json_path(dir.path(), "en")).unwrap(),
            map(&[("03tpnc", "")])
        );
    }

    #[test]
    fn owned_runtime_can_be_dropped_in_async_context() {
        let dir = tempdir().unwrap();
        let session = TransformSession::new(options(), dir.path(), SessionMode::Watch).unwrap();
        assert!(session.runtime.is_some());
        session
            .transform("const a = \"你好\";", &dir.path().join("src/a.ts"))
            .unwrap();
        assert!(session.has_pending_flush());

        let host = tokio::runtime::Runtime::new().unwrap();
        host.block_on(async move {
            session.finish().await.unwrap();
            drop(session);
        });

        assert_eq!(
            read_locale(&options().lang_json_path(dir.path(), "zh-cn")).unwrap(),
            map(&[("03tpnc", "你好")])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn watch_mode_debounces_flush() {
        let dir = tempdir().unwrap();
        let opts = options();
        let source_path = opts.lang_json_path(dir.path(), "zh-cn");
        let session = TransformSession::new(opts, dir.path(), SessionMode::Watch).unwrap();

        session
            .transform("const a = \"你好\";", &dir.path().join("src/a.ts"))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        session
            .transform("const b = \"世界\";", &dir.path().join("src/b.ts"))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!source_path.exists());
        assert!(session.has_pending_flush());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(
            read_locale(&source_path).unwrap(),
            map(&[("03tpnc", "你好"), ("03tp3z", "世界")])
        );
    }
}
