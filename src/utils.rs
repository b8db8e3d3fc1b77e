//! Common utility functions shared across the codebase.

/// Quote style for generated JavaScript string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// `"text"`, used in script sources.
    Double,
    /// `'text'`, used inside double-quoted markup attributes.
    Single,
}

/// Render `text` as a JavaScript string literal.
///
/// Single-quoted literals also escape `"` so they can sit inside a
/// double-quoted HTML attribute.
///
/// # Examples
///
/// ```
/// use i18n_extract::utils::{Quote, js_string};
///
/// assert_eq!(js_string("你好", Quote::Double), "\"你好\"");
/// assert_eq!(js_string("it's", Quote::Single), "'it\\'s'");
/// assert_eq!(js_string("say \"hi\"", Quote::Single), "'say \\u0022hi\\u0022'");
/// ```
pub fn js_string(text: &str, quote: Quote) -> String {
    let delimiter = match quote {
        Quote::Double => '"',
        Quote::Single => '\'',
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(delimiter);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '"' if quote == Quote::Double => out.push_str("\\\""),
            '"' => out.push_str("\\u0022"),
            '\'' if quote == Quote::Single => out.push_str("\\'"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Collapse every run of whitespace into a single space and trim the ends.
///
/// ```
/// use i18n_extract::utils::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("\n   你好\n   世界  "), "你好 世界");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the character references markup text may carry: the common named
/// ones plus decimal and hex numeric references. Anything else is kept as is.
///
/// ```
/// use i18n_extract::utils::decode_entities;
///
/// assert_eq!(decode_entities("a &amp; b&#33;"), "a & b!");
/// assert_eq!(decode_entities("&copy; &"), "&copy; &");
/// ```
pub fn decode_entities(text: &str) -> std::borrow::Cow<'_, str> {
    if !text.contains('&') {
        return std::borrow::Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    std::borrow::Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Byte range of `text` with leading and trailing whitespace removed,
/// relative to the start of `text`.
pub fn trimmed_range(text: &str) -> Option<std::ops::Range<usize>> {
    let start = text.len() - text.trim_start().len();
    let end = text.trim_end().len();
    (start < end).then_some(start..end)
}

/// 1-based line and column (in characters) of a byte offset, plus the line text.
pub fn line_col(source: &str, offset: usize) -> (usize, usize, &str) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |i| line_start + i);
    let line = before.matches('\n').count() + 1;
    let col = before[line_start..].chars().count() + 1;
    (line, col, source[line_start..line_end].trim_end_matches('\r'))
}
