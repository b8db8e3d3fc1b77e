//! Source parsers.
//!
//! - `script`: JS/TS/JSX module and expression parsing (swc)
//! - `sfc`: Vue single-file component block splitting
//! - `template`: Vue template tokenizing with byte offsets

pub mod script;
pub mod sfc;
pub mod template;
