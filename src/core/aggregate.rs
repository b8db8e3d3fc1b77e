//! Run-wide accumulation of extracted keys.

use std::sync::{Mutex, MutexGuard};

use indexmap::IndexMap;

/// Ordered `hash -> text` map for one language.
pub type I18nMap = IndexMap<String, String>;

/// Collects per-file maps into one map for the duration of a run.
///
/// Each run (or host build session) owns its own aggregator and passes it
/// down explicitly; merges from parallel workers are serialized by a mutex.
#[derive(Debug, Default)]
pub struct Aggregator {
    map: Mutex<I18nMap>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Additive union: existing keys are overwritten by the same key's text,
    /// nothing is ever removed.
    pub fn merge(&self, local: I18nMap) {
        if local.is_empty() {
            return;
        }
        self.lock().extend(local);
    }

    pub fn snapshot(&self) -> I18nMap {
        self.lock().clone()
    }

    /// Take the accumulated map, leaving the aggregator empty.
    pub fn flush(&self) -> I18nMap {
        std::mem::take(&mut *self.lock())
    }

    pub fn reset(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, I18nMap> {
        // Entries are only ever added whole, so a poisoned map is still valid.
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use pretty_assertions::assert_eq;

    fn map(entries: &[(&str, &str)]) -> I18nMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn merge_is_additive() {
        let aggregator = Aggregator::new();
        aggregator.merge(map(&[("a", "甲")]));
        aggregator.merge(map(&[("b", "乙")]));
        aggregator.merge(map(&[("a", "甲")]));
        assert_eq!(aggregator.snapshot(), map(&[("a", "甲"), ("b", "乙")]));
    }

    #[test]
    fn flush_and_reset_empty_the_map() {
        let aggregator = Aggregator::new();
        aggregator.merge(map(&[("a", "甲")]));
        assert_eq!(aggregator.flush(), map(&[("a", "甲")]));
        assert!(aggregator.is_empty());

        aggregator.merge(map(&[("b", "乙")]));
        aggregator.reset();
        assert_eq!(aggregator.len(), 0);
    }

    #[test]
    fn concurrent_merges_lose_nothing() {
        let aggregator = Arc::new(Aggregator::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let aggregator = Arc::clone(&aggregator);
                thread::spawn(move || {
                    for i in 0..50 {
                        let key = format!("{worker}-{i}");
                        aggregator.merge(map(&[(key.as_str(), "文本")]));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(aggregator.len(), 400);
    }
}
