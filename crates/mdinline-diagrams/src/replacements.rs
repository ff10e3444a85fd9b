//! Positional substitution of diagram blocks.
//!
//! Substitutions are keyed by the byte range of the block they replace in the
//! original text, so two byte-identical blocks never swap images.

use std::ops::Range;

use crate::extract::DiagramBlock;

/// A recorded replacement of one diagram block.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Substitution<'a> {
    /// Byte range of the block in the original text.
    range: Range<usize>,
    /// The block text being replaced.
    original: &'a str,
    /// Text written in place of the block.
    replacement: String,
}

/// Collects substitutions for single-pass application.
#[derive(Debug, Default)]
pub struct Substitutions<'a> {
    items: Vec<Substitution<'a>>,
}

impl<'a> Substitutions<'a> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection with room for `capacity` substitutions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Queue replacing `block` with `replacement`.
    pub fn add(&mut self, block: &DiagramBlock<'a>, replacement: String) {
        self.items.push(Substitution {
            range: block.range.clone(),
            original: block.original,
            replacement,
        });
    }

    /// Number of queued substitutions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply all substitutions to `text` in a single pass.
    ///
    /// `text` must be the text the blocks were extracted from. Ranges that
    /// overlap an earlier substitution, fall outside `text`, or no longer
    /// hold the recorded block are skipped.
    #[must_use]
    pub fn apply(mut self, text: &str) -> String {
        if self.items.is_empty() {
            return text.to_owned();
        }

        self.items.sort_by_key(|s| s.range.start);

        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;

        for sub in &self.items {
            if sub.range.start < cursor || text.get(sub.range.clone()) != Some(sub.original) {
                tracing::warn!(
                    start = sub.range.start,
                    end = sub.range.end,
                    "Skipping substitution that does not match the document"
                );
                continue;
            }
            result.push_str(&text[cursor..sub.range.start]);
            result.push_str(&sub.replacement);
            cursor = sub.range.end;
        }

        result.push_str(&text[cursor..]);
        result
    }
}
