//! Vue single-file component block splitter.
//!
//! Finds the top-level `<template>` and every `<script>` block of a `.vue`
//! file, keeping byte offsets so rewrites can be spliced back into the
//! original text.

use memchr::memmem;

use super::template::{find_tag_end, parse_attributes};

/// Maximum file size accepted (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum number of `<script>` blocks per component.
pub const MAX_SCRIPT_BLOCKS: usize = 2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SfcError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Too many script blocks: {count} found (max: {max} allowed)")]
    TooManyScriptBlocks { count: usize, max: usize },

    #[error("Unclosed <{tag}> block starting at byte {position}")]
    UnclosedBlock { tag: String, position: usize },
}

impl SfcError {
    /// Byte offset the error points at, when it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            SfcError::UnclosedBlock { position, .. } => Some(*position),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfcBlock<'a> {
    pub content: &'a str,
    /// Byte offset of `content` in the file.
    pub offset: usize,
    pub lang: Option<&'a str>,
    pub setup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SfcDescriptor<'a> {
    pub template: Option<SfcBlock<'a>>,
    pub scripts: Vec<SfcBlock<'a>>,
}

pub fn parse_sfc(source: &str) -> Result<SfcDescriptor<'_>, SfcError> {
    if source.len() > MAX_FILE_SIZE {
        return Err(SfcError::FileTooLarge {
            size: source.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let bytes = source.as_bytes();
    let mut descriptor = SfcDescriptor::default();
    let mut pos = 0;

    while let Some(found) = memchr::memchr(b'<', &bytes[pos..]) {
        let start = pos + found;

        if bytes[start..].starts_with(b"<!--") {
            pos = memmem::find(&bytes[start + 4..], b"-->")
                .map_or(bytes.len(), |end| start + 4 + end + 3);
            continue;
        }

        let name_start = start + 1;
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'-')
            .count();
        if name_len == 0 {
            pos = start + 1;
            continue;
        }
        let name = &source[name_start..name_start + name_len];

        let (attributes, tag_end) = parse_attributes(source, name_start + name_len, 0);
        let Some(tag_end) = tag_end else {
            return Err(SfcError::UnclosedBlock {
                tag: name.to_string(),
                position: start,
            });
        };
        let attr = |wanted: &str| attributes.iter().find(|a| a.name == wanted);
        let lang = attr("lang").and_then(|a| a.value.as_ref()).map(|v| v.text);
        let setup = attr("setup").is_some();

        if bytes[tag_end - 1] == b'/' {
            pos = tag_end + 1;
            continue;
        }

        let content_start = tag_end + 1;
        let content_end = if name == "template" {
            find_template_end(bytes, content_start)
        } else {
            memmem::find(&bytes[content_start..], format!("</{}", name).as_bytes())
                .map(|i| content_start + i)
        }
        .ok_or_else(|| SfcError::UnclosedBlock {
            tag: name.to_string(),
            position: start,
        })?;

        let block = SfcBlock {
            content: &source[content_start..content_end],
            offset: content_start,
            lang,
            setup,
        };
        match name {
            "template" if descriptor.template.is_none() => descriptor.template = Some(block),
            "script" => {
                descriptor.scripts.push(block);
                if descriptor.scripts.len() > MAX_SCRIPT_BLOCKS {
                    return Err(SfcError::TooManyScriptBlocks {
                        count: descriptor.scripts.len(),
                        max: MAX_SCRIPT_BLOCKS,
                    });
                }
            }
            _ => {}
        }

        pos = find_tag_end(bytes, content_end).map_or(bytes.len(), |end| end + 1);
    }

    Ok(descriptor)
}

/// Find the `</template>` matching an already-open `<template>`, counting
/// nested `<template>` elements.
fn find_template_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut pos = start;

    while let Some(found) = memchr::memchr(b'<', &bytes[pos..]) {
        let at = pos + found;
        let rest = &bytes[at..];
        if rest.starts_with(b"<!--") {
            pos = memmem::find(&rest[4..], b"-->").map_or(bytes.len(), |end| at + 4 + end + 3);
            continue;
        }
        if rest.starts_with(b"</template") && is_name_end(rest.get(10)) {
            depth -= 1;
            if depth == 0 {
                return Some(at);
            }
        } else if rest.starts_with(b"<template") && is_name_end(rest.get(9)) {
            let self_closing = find_tag_end(bytes, at)
                .is_some_and(|end| end > 0 && bytes[end - 1] == b'/');
            if !self_closing {
                depth += 1;
            }
        }
        pos = at + 1;
    }

    None
}

fn is_name_end(byte: Option<&u8>) -> bool {
    matches!(byte.copied(), None | Some(b'>' | b'/')) || byte.is_some_and(u8::is_ascii_whitespace)
}
