//! Fenced diagram block extraction.

use std::ops::Range;

use crate::language::DiagramLanguage;

/// A diagram block found in a document.
///
/// Borrows from the document text; lives for one processing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock<'a> {
    /// 1-based position of the block within its document.
    pub seq: usize,
    /// Byte range of the whole fenced block in the document text.
    pub range: Range<usize>,
    /// The whole fenced block, fences included.
    pub original: &'a str,
    /// Diagram source with surrounding whitespace trimmed.
    pub source: &'a str,
}

impl DiagramBlock<'_> {
    /// 1-based line number of the opening fence.
    #[must_use]
    pub fn line_in(&self, text: &str) -> usize {
        text[..self.range.start].matches('\n').count() + 1
    }
}

/// Find every non-overlapping diagram block of `language` in `text`.
///
/// Blocks are returned in order of appearance and numbered from 1.
#[must_use]
pub fn extract_blocks(text: &str, language: DiagramLanguage) -> Vec<DiagramBlock<'_>> {
    language
        .block_pattern()
        .captures_iter(text)
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let source = caps.get(1)?;
            Some(DiagramBlock {
                seq: i + 1,
                range: whole.range(),
                original: whole.as_str(),
                source: source.as_str(),
            })
        })
        .collect()
}
