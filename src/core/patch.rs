//! Offset-addressed source patching.
//!
//! Rewrites are recorded as `(range, replacement)` edits against the original
//! text and applied in one left-to-right pass, so everything outside the
//! edited ranges keeps its original formatting.

use std::ops::Range;

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub text: String,
}

/// An ordered collection of edits against one source buffer.
#[derive(Debug, Clone, Default)]
pub struct Patcher {
    edits: Vec<Edit>,
}

impl Patcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.edits.push(Edit {
            range,
            text: text.into(),
        });
    }

    pub fn insert(&mut self, pos: usize, text: impl Into<String>) {
        self.replace(pos..pos, text);
    }

    pub fn remove(&mut self, range: Range<usize>) {
        self.replace(range, "");
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Move all edits of `other` into `self`, shifted by `offset` bytes.
    ///
    /// Used when a sub-document (a script block, a template expression) was
    /// patched relative to its own start.
    pub fn absorb(&mut self, other: Patcher, offset: usize) {
        self.edits.extend(other.edits.into_iter().map(|edit| Edit {
            range: edit.range.start + offset..edit.range.end + offset,
            text: edit.text,
        }));
    }

    /// Apply the edits to `source`.
    ///
    /// Edits are ordered by position; edits at the same position keep their
    /// recording order. An edit overlapping an earlier one, or not falling on
    /// character boundaries, is dropped.
    pub fn apply(&self, source: &str) -> String {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|edit| (edit.range.start, edit.range.end));

        let mut out = String::with_capacity(source.len() + 64);
        let mut cursor = 0;
        for edit in ordered {
            let Range { start, end } = edit.range;
            if start < cursor
                || end < start
                || end > source.len()
                || !source.is_char_boundary(start)
                || !source.is_char_boundary(end)
            {
                debug!(start, end, "dropping conflicting edit");
                continue;
            }
            out.push_str(&source[cursor..start]);
            out.push_str(&edit.text);
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}
