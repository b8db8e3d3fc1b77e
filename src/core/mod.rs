//! Extraction engine.
//!
//! - `key`, `classify`, `exclusion`: per-literal decisions
//! - `rewrite`, `markup`: script and Vue template rewriting
//! - `engine`: per-file dispatch
//! - `aggregate`, `store`: run-wide key map and locale files
//! - `translate`: machine translation of target locales
//! - `pipeline`, `session`: CLI run and host build integration

pub mod aggregate;
pub mod classify;
pub mod debounce;
pub mod engine;
pub mod exclusion;
pub mod file_scanner;
pub mod key;
pub mod markup;
pub mod parsers;
pub mod patch;
pub mod pipeline;
pub mod rewrite;
pub mod session;
pub mod store;
pub mod translate;

pub use aggregate::{Aggregator, I18nMap};
pub use engine::{Engine, FileOutcome};
pub use session::{SessionMode, TransformSession};
