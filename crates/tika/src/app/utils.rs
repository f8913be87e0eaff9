//! Pure cursor-geometry helpers
//!
//! All offsets are char offsets into a pane's visible text, the same
//! coordinate space the engine's selection interface speaks.

use unicode_segmentation::UnicodeSegmentation;

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Char offsets where grapheme clusters start, with an end sentinel.
/// Cursor movement steps between these so a combining sequence is never
/// split.
pub(crate) fn grapheme_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::with_capacity(text.len() / 2 + 1);
    let mut offset = 0usize;
    for grapheme in text.graphemes(true) {
        starts.push(offset);
        offset += grapheme.chars().count();
    }
    starts.push(offset);
    starts
}

/// The grapheme boundary strictly after `offset`, or the text end.
pub(crate) fn next_boundary(text: &str, offset: usize) -> usize {
    let starts = grapheme_starts(text);
    starts
        .iter()
        .copied()
        .find(|&s| s > offset)
        .unwrap_or_else(|| starts.last().copied().unwrap_or(0))
}

/// The grapheme boundary strictly before `offset`.
pub(crate) fn prev_boundary(text: &str, offset: usize) -> usize {
    grapheme_starts(text)
        .iter()
        .copied()
        .take_while(|&s| s < offset)
        .last()
        .unwrap_or(0)
}

/// Char offset of each line start. Always non-empty; a trailing newline
/// opens a final empty line.
pub(crate) fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0usize];
    for (i, c) in text.chars().enumerate() {
        if c == '\n' {
            starts.push(i + 1);
        }
    }
    starts
}

/// `(line, column)` of a char offset.
pub(crate) fn line_col(starts: &[usize], offset: usize) -> (usize, usize) {
    let line = match starts.binary_search(&offset) {
        Ok(exact) => exact,
        Err(insert) => insert.saturating_sub(1),
    };
    (line, offset - starts[line])
}

/// Char offset of `(line, column)`, clamped to the line's content (the
/// newline itself is not addressable from another line).
pub(crate) fn offset_at(starts: &[usize], text_len: usize, line: usize, col: usize) -> usize {
    let line = line.min(starts.len() - 1);
    let start = starts[line];
    let line_end = if line + 1 < starts.len() {
        starts[line + 1] - 1
    } else {
        text_len
    };
    start.saturating_add(col).min(line_end)
}
