//! Placeholder translator.
//!
//! Every text translates to an empty string, which seeds target locales with
//! the full key set for manual translation.

use anyhow::Result;
use futures::FutureExt;
use futures::future::BoxFuture;

use super::translator::Translator;

#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTranslator;

impl Translator for EmptyTranslator {
    fn name(&self) -> &str {
        "empty"
    }

    fn max_chunk_size(&self) -> usize {
        usize::MAX
    }

    fn fetch<'a>(
        &'a self,
        text: &'a str,
        _from: &'a str,
        _to: &'a str,
        separator: &'a str,
    ) -> BoxFuture<'a, Result<String>> {
        let blank = vec![""; text.split(separator).count()].join(separator);
        async move { Ok(blank) }.boxed()
    }
}
