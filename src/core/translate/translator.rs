//! Translator back-end contract and the rate-limiting dispatcher.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::debug;

/// Default maximum characters per request.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 4500;

/// A machine-translation back-end.
///
/// `fetch` receives a chunk of texts joined by `separator` and must return
/// the translation with the separators preserved.
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    fn max_chunk_size(&self) -> usize {
        DEFAULT_MAX_CHUNK_SIZE
    }

    /// Minimum delay between two requests. Zero lets requests run
    /// concurrently.
    fn interval(&self) -> Duration {
        Duration::ZERO
    }

    fn fetch<'a>(
        &'a self,
        text: &'a str,
        from: &'a str,
        to: &'a str,
        separator: &'a str,
    ) -> BoxFuture<'a, Result<String>>;
}

pub type SharedTranslator = Arc<dyn Translator>;

/// Milliseconds since the Unix epoch, used as a request salt by signed APIs.
pub(crate) fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}

/// Sends chunks to a translator, spacing requests by its interval.
pub struct Dispatcher {
    translator: SharedTranslator,
    last_fetch: Mutex<Option<Instant>>,
}

impl Dispatcher {
    pub fn new(translator: SharedTranslator) -> Self {
        Self {
            translator,
            last_fetch: Mutex::new(None),
        }
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub async fn dispatch(&self, text: &str, from: &str, to: &str, separator: &str) -> Result<String> {
        let interval = self.translator.interval();
        if interval.is_zero() {
            return self.translator.fetch(text, from, to, separator).await;
        }

        // Holding the lock across the fetch serializes requests.
        let mut last_fetch = self.last_fetch.lock().await;
        if let Some(last) = *last_fetch {
            sleep_until(last + interval).await;
        }
        debug!(translator = self.translator.name(), to, "dispatching chunk");
        let result = self.translator.fetch(text, from, to, separator).await;
        *last_fetch = Some(Instant::now());
        result
    }
}
