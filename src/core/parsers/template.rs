//! Offset-tracking tokenizer for Vue template markup.
//!
//! Only what extraction needs is produced: text runs, `{{ }}` interpolations
//! and element attributes, each with byte ranges into the original file.
//! Comments and the contents of raw-text elements are skipped.

use std::ops::Range;

use memchr::memmem;

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A tokenized template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode<'a> {
    /// Plain text between tags and interpolations.
    Text { text: &'a str, range: Range<usize> },
    /// `{{ expr }}`; `range` covers the braces, `expr_range` the inside.
    Interpolation {
        expr: &'a str,
        range: Range<usize>,
        expr_range: Range<usize>,
    },
    Attribute(Attribute<'a>),
}

/// An attribute inside a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Option<AttributeValue<'a>>,
    /// The whole attribute, name through closing quote.
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue<'a> {
    pub text: &'a str,
    /// The value without its quotes.
    pub range: Range<usize>,
    pub quote: Option<char>,
}

/// Tokenize `source`, reporting ranges shifted by `base`.
pub fn tokenize(source: &str, base: usize) -> Vec<TemplateNode<'_>> {
    let bytes = source.as_bytes();
    let mut nodes = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'<' {
            if bytes[pos..].starts_with(b"<!--") {
                pos = memmem::find(&bytes[pos + 4..], b"-->")
                    .map_or(bytes.len(), |end| pos + 4 + end + 3);
                continue;
            }
            match bytes.get(pos + 1).copied() {
                Some(b'/' | b'!' | b'?') => {
                    pos = find_tag_end(bytes, pos + 1).map_or(bytes.len(), |end| end + 1);
                    continue;
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    pos = parse_start_tag(source, pos, base, &mut nodes);
                    continue;
                }
                _ => {}
            }
        }
        pos = parse_text(source, pos, base, &mut nodes);
    }

    nodes
}

/// Parse a text run (with interpolations) starting at `start`; returns the
/// position of the next tag.
fn parse_text<'a>(
    source: &'a str,
    start: usize,
    base: usize,
    nodes: &mut Vec<TemplateNode<'a>>,
) -> usize {
    let bytes = source.as_bytes();
    let mut pos = start;
    let mut text_start = start;

    while pos < bytes.len() {
        if bytes[pos..].starts_with(b"{{") {
            let Some(close) = memmem::find(&bytes[pos + 2..], b"}}") else {
                break;
            };
            push_text(source, text_start, pos, base, nodes);
            let expr_start = pos + 2;
            let expr_end = expr_start + close;
            nodes.push(TemplateNode::Interpolation {
                expr: &source[expr_start..expr_end],
                range: base + pos..base + expr_end + 2,
                expr_range: base + expr_start..base + expr_end,
            });
            pos = expr_end + 2;
            text_start = pos;
            continue;
        }
        if bytes[pos] == b'<' && pos > start && starts_tag(bytes, pos) {
            break;
        }
        pos += 1;
    }

    let end = if pos >= bytes.len() { bytes.len() } else { pos };
    push_text(source, text_start, end, base, nodes);
    end.max(start + 1)
}

fn starts_tag(bytes: &[u8], pos: usize) -> bool {
    matches!(
        bytes.get(pos + 1).copied(),
        Some(c) if c.is_ascii_alphabetic() || matches!(c, b'/' | b'!' | b'?')
    )
}

fn push_text<'a>(
    source: &'a str,
    start: usize,
    end: usize,
    base: usize,
    nodes: &mut Vec<TemplateNode<'a>>,
) {
    if start < end && !source[start..end].trim().is_empty() {
        nodes.push(TemplateNode::Text {
            text: &source[start..end],
            range: base + start..base + end,
        });
    }
}

/// Parse `<name attrs...>` starting at the `<`; returns the position after
/// the tag (or after the matching close tag for raw-text elements).
fn parse_start_tag<'a>(
    source: &'a str,
    start: usize,
    base: usize,
    nodes: &mut Vec<TemplateNode<'a>>,
) -> usize {
    let bytes = source.as_bytes();
    let name_start = start + 1;
    let name_end = bytes[name_start..]
        .iter()
        .position(|&b| b.is_ascii_whitespace() || b == b'>' || b == b'/')
        .map_or(bytes.len(), |i| name_start + i);
    let name = &source[name_start..name_end];

    let (attributes, tag_end) = parse_attributes(source, name_end, base);
    nodes.extend(attributes.into_iter().map(TemplateNode::Attribute));

    let Some(tag_end) = tag_end else {
        return bytes.len();
    };
    let after = tag_end + 1;

    let self_closing = tag_end > 0 && bytes[tag_end - 1] == b'/';
    if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.to_ascii_lowercase().as_str()) {
        let close = format!("</{}", name);
        return memmem::find(&bytes[after..], close.as_bytes())
            .and_then(|i| find_tag_end(bytes, after + i))
            .map_or(bytes.len(), |end| end + 1);
    }
    after
}

/// Parse attributes from `start` up to the closing `>` of the tag.
///
/// Returns the attributes and the position of the `>`, if the tag is closed.
pub fn parse_attributes(
    source: &str,
    start: usize,
    base: usize,
) -> (Vec<Attribute<'_>>, Option<usize>) {
    let bytes = source.as_bytes();
    let mut attributes = Vec::new();
    let mut pos = start;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos).copied() {
            None => return (attributes, None),
            Some(b'>') => return (attributes, Some(pos)),
            Some(b'/') if bytes.get(pos + 1) == Some(&b'>') => {
                return (attributes, Some(pos + 1));
            }
            Some(b'/') => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>')
            && !(bytes[pos] == b'/' && bytes.get(pos + 1) == Some(&b'>'))
        {
            pos += 1;
        }
        let name_end = pos;

        let mut look = pos;
        while look < bytes.len() && bytes[look].is_ascii_whitespace() {
            look += 1;
        }

        let mut value = None;
        let mut attr_end = name_end;
        if bytes.get(look) == Some(&b'=') {
            look += 1;
            while look < bytes.len() && bytes[look].is_ascii_whitespace() {
                look += 1;
            }
            match bytes.get(look).copied() {
                Some(q) if q == b'"' || q == b'\'' => {
                    let value_start = look + 1;
                    let value_end = memchr::memchr(q, &bytes[value_start..])
                        .map_or(bytes.len(), |i| value_start + i);
                    value = Some(AttributeValue {
                        text: &source[value_start..value_end],
                        range: base + value_start..base + value_end,
                        quote: Some(q as char),
                    });
                    attr_end = (value_end + 1).min(bytes.len());
                }
                Some(_) => {
                    let value_start = look;
                    let value_end = bytes[value_start..]
                        .iter()
                        .position(|&b| b.is_ascii_whitespace() || b == b'>')
                        .map_or(bytes.len(), |i| value_start + i);
                    value = Some(AttributeValue {
                        text: &source[value_start..value_end],
                        range: base + value_start..base + value_end,
                        quote: None,
                    });
                    attr_end = value_end;
                }
                None => attr_end = look,
            }
            pos = attr_end;
        }

        if name_end > name_start {
            attributes.push(Attribute {
                name: &source[name_start..name_end],
                value,
                range: base + name_start..base + attr_end,
            });
        } else {
            pos += 1;
        }
    }
}

/// Position of the `>` closing the tag that starts before `start`,
/// ignoring `>` inside quoted attribute values.
pub fn find_tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &byte) in bytes.iter().enumerate().skip(start) {
        match (quote, byte) {
            (None, b'"' | b'\'') => quote = Some(byte),
            (Some(q), b) if b == q => quote = None,
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}
