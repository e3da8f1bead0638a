use std::ops::Range;

use thiserror::Error;
use tree_sitter::Node;

/// A replacement of one byte range of the original source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl SourceEdit {
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Replace the full text of `node`.
    pub fn replace_node(node: Node<'_>, replacement: impl Into<String>) -> Self {
        Self::new(node.byte_range(), replacement)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Edit {start}..{end} is outside of the {len} byte source")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Edit {start}..{end} does not fall on character boundaries")]
    NotCharBoundary { start: usize, end: usize },

    #[error("Edits {first:?} and {second:?} overlap")]
    Overlap {
        first: Range<usize>,
        second: Range<usize>,
    },
}

/// Apply edits to `text`.
///
/// Edits are sorted by position; exact duplicates are collapsed. Any two
/// distinct edits touching the same bytes are rejected instead of guessing an
/// order.
pub fn apply_edits(text: &str, mut edits: Vec<SourceEdit>) -> Result<String, EditError> {
    edits.sort_by(|a, b| {
        (a.range.start, a.range.end, &a.replacement).cmp(&(
            b.range.start,
            b.range.end,
            &b.replacement,
        ))
    });
    edits.dedup();

    for edit in &edits {
        let Range { start, end } = edit.range;
        if start > end || end > text.len() {
            return Err(EditError::OutOfBounds {
                start,
                end,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(EditError::NotCharBoundary { start, end });
        }
    }

    for pair in edits.windows(2) {
        let (a, b) = (&pair[0].range, &pair[1].range);
        if b.start < a.end || a == b {
            return Err(EditError::Overlap {
                first: a.clone(),
                second: b.clone(),
            });
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&text[cursor..edit.range.start]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}
