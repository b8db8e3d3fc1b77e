//! Packing texts into translator-sized chunks and splitting them back.
//!
//! Texts travel joined by [`SEPARATOR`]. Translators occasionally mangle the
//! separator (spaces between the marks, or the marks replaced entirely), so
//! splitting is lenient.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::PostProcessor;

pub const SEPARATOR: &str = "\n┇┇┇\n";

static SPLIT_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n┇ *┇ *┇\n").unwrap());

/// A group of texts sent to the translator in one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The texts joined by [`SEPARATOR`].
    pub text: String,
    /// Number of texts in the chunk.
    pub count: usize,
}

/// Greedily pack `texts` into chunks of at most `max_chunk_size` characters.
///
/// A text longer than the limit becomes a chunk of its own.
pub fn create_text_splitter<S: AsRef<str>>(texts: &[S], max_chunk_size: usize) -> Vec<Chunk> {
    let separator_len = SEPARATOR.chars().count();
    let mut chunks = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    let mut current_size = 0;

    let commit = |buffer: &mut Vec<&str>, chunks: &mut Vec<Chunk>| {
        if !buffer.is_empty() {
            chunks.push(Chunk {
                text: buffer.join(SEPARATOR),
                count: buffer.len(),
            });
            buffer.clear();
        }
    };

    for text in texts {
        let text = text.as_ref();
        let len = text.chars().count();

        if len > max_chunk_size {
            commit(&mut buffer, &mut chunks);
            current_size = 0;
            if len as f64 > max_chunk_size as f64 * 1.5 {
                warn!(
                    length = len,
                    "text is far longer than the translator chunk size, quality may suffer"
                );
            }
            chunks.push(Chunk {
                text: text.to_string(),
                count: 1,
            });
            continue;
        }

        let needed = len + if buffer.is_empty() { 0 } else { separator_len };
        if current_size + needed > max_chunk_size {
            commit(&mut buffer, &mut chunks);
            current_size = 0;
        }
        current_size += if buffer.is_empty() { len } else { needed };
        buffer.push(text);
    }
    commit(&mut buffer, &mut chunks);

    chunks
}

/// Split a translated chunk back into its texts.
///
/// When no separator survived the round trip, a line of exactly three
/// characters is taken as the mangled separator, provided splitting on it
/// yields more than one non-empty text.
pub fn split_translation(text: &str, lang: &str, post: &dyn PostProcessor) -> Vec<String> {
    let finish = |piece: &str| post.process(piece.trim().to_string(), lang);

    if SPLIT_SEPARATOR_REGEX.is_match(text) {
        return SPLIT_SEPARATOR_REGEX.split(text).map(finish).collect();
    }

    if let Some(separator) = text.split('\n').find(|line| line.chars().count() == 3) {
        let pattern = format!("\n{}\n", separator);
        let pieces: Vec<String> = text
            .split(pattern.as_str())
            .map(finish)
            .filter(|piece| !piece.is_empty())
            .collect();
        if pieces.len() > 1 {
            return pieces;
        }
    }

    vec![finish(text)]
}

/// Pad with empty strings or truncate `values` to exactly `count` entries.
pub fn align(mut values: Vec<String>, count: usize) -> Vec<String> {
    values.resize(count, String::new());
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::translate::{FnPostProcessor, NoopPostProcessor};
    use pretty_assertions::assert_eq;

    #[test]
    fn packs_small_texts_together() {
        let chunks = create_text_splitter(&["你好", "世界", "标题"], 100);
        assert_eq!(
            chunks,
            vec![Chunk {
                text: "你好\n┇┇┇\n世界\n┇┇┇\n标题".to_string(),
                count: 3,
            }]
        );
    }

    #[test]
    fn respects_max_size() {
        // Each text is 4 chars, the separator 5: two texts need 13.
        let chunks = create_text_splitter(&["aaaa", "bbbb", "cccc"], 13);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].count, 2);
        assert_eq!(chunks[1].text, "cccc");
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 13);
        }
    }

    #[test]
    fn oversized_text_gets_its_own_chunk() {
        let long = "x".repeat(30);
        let chunks = create_text_splitter(&["a", long.as_str(), "b"], 10);
        let counts: Vec<usize> = chunks.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert_eq!(chunks[1].text, long);
    }

    #[test]
    fn empty_input_has_no_chunks() {
        assert!(create_text_splitter::<&str>(&[], 10).is_empty());
    }

    #[test]
    fn splits_on_separator_round_trip() {
        let texts = ["你好", "世界", "标题"];
        let chunks = create_text_splitter(&texts, 4500);
        let pieces = split_translation(&chunks[0].text, "en", &NoopPostProcessor);
        assert_eq!(pieces, texts);
    }

    #[test]
    fn tolerates_spaced_separator() {
        let pieces = split_translation("Hello\n┇ ┇ ┇\nWorld", "en", &NoopPostProcessor);
        assert_eq!(pieces, vec!["Hello", "World"]);
    }

    #[test]
    fn falls_back_to_three_char_line() {
        let pieces = split_translation("Hello\n|||\nWorld\n|||\nTitle", "en", &NoopPostProcessor);
        assert_eq!(pieces, vec!["Hello", "World", "Title"]);
    }

    #[test]
    fn three_char_text_alone_is_not_a_separator() {
        let pieces = split_translation("Hi!", "en", &NoopPostProcessor);
        assert_eq!(pieces, vec!["Hi!"]);
    }

    #[test]
    fn pieces_are_trimmed_and_post_processed() {
        let post = FnPostProcessor(|text: String, lang: &str| format!("[{}] {}", lang, text));
        let pieces = split_translation(" Hello \n┇┇┇\n World ", "en", &post);
        assert_eq!(pieces, vec!["[en] Hello", "[en] World"]);
    }

    #[test]
    fn align_pads_and_truncates() {
        assert_eq!(align(vec!["a".to_string()], 3), vec!["a", "", ""]);
        assert_eq!(
            align(vec!["a".to_string(), "b".to_string()], 1),
            vec!["a".to_string()]
        );
    }
}
