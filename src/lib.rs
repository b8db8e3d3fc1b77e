//! i18n-extract - translatable text extraction for JavaScript, TypeScript and Vue
//!
//! Scans source files for natural-language literals, replaces them with
//! translation calls keyed by a short content hash, and maintains the locale
//! JSON files: the source locale is written from the extracted text, target
//! locales are machine-translated and pruned.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine, locale store, translation and host sessions
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
