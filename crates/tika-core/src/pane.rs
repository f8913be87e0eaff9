//! Pane state and highlight operations

use crate::markup::{self, Highlight, Segment};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use thiserror::Error;

/// Number of palette slots highlights cycle through.
pub const PALETTE_SIZE: usize = 3;

/// Display names for the palette slots, in slot order.
pub const PALETTE_NAMES: [&str; PALETTE_SIZE] = ["YELLOW", "GREEN", "BLUE"];

/// Why a highlight operation was rejected.
///
/// A rejection leaves the pane untouched and consumes no history snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("Selection overlap. Highlight a clean segment of text.")]
    Overlap,
    #[error("nothing selected")]
    EmptySelection,
    #[error("selection ends past the pane text ({end} > {len})")]
    OutOfBounds { end: usize, len: usize },
    #[error("no highlight #{0} in this pane")]
    UnknownOrdinal(usize),
}

/// One pane's annotated content.
///
/// Selection and interval coordinates are character offsets into the
/// pane's visible text; markup markers occupy no coordinate space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneState {
    segments: Vec<Segment>,
    /// Palette index assigned to the next created highlight. Advisory:
    /// the renumber pass decides the color that actually sticks.
    pub color_cursor: usize,
    /// Line offset of the most recently created highlight, kept only so a
    /// surface can restore scroll position after a load.
    pub last_highlight_line: usize,
}

impl PaneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted markup string. Stored numbering may be
    /// stale relative to edits made through other paths, so this always
    /// renumbers.
    pub fn from_markup(content: &str, color_cursor: usize, last_highlight_line: usize) -> Self {
        let mut pane = Self {
            segments: markup::parse(content),
            color_cursor: color_cursor % PALETTE_SIZE,
            last_highlight_line,
        };
        pane.renumber();
        pane
    }

    /// The buffer in document order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Serialize the buffer to the markup wire format.
    pub fn markup(&self) -> String {
        markup::render(&self.segments)
    }

    /// The pane's visible text (markup markers excluded).
    pub fn visible_text(&self) -> String {
        markup::visible_text(&self.segments)
    }

    /// True iff the visible text is all whitespace.
    pub fn is_empty(&self) -> bool {
        self.visible_text().trim().is_empty()
    }

    pub fn highlight_count(&self) -> usize {
        self.highlights().count()
    }

    /// Highlights in document order.
    pub fn highlights(&self) -> impl Iterator<Item = &Highlight> {
        self.segments.iter().filter_map(|seg| match seg {
            Segment::Highlight(h) => Some(h),
            Segment::Text(_) => None,
        })
    }

    /// The highlight with the given ordinal, if live.
    pub fn highlight(&self, ordinal: usize) -> Option<&Highlight> {
        self.highlights().find(|h| h.ordinal == ordinal)
    }

    /// `(ordinal, char interval)` for every highlight, in document order.
    pub fn highlight_intervals(&self) -> Vec<(usize, Range<usize>)> {
        let mut intervals = Vec::new();
        let mut offset = 0usize;
        for seg in &self.segments {
            let len = seg.visible_len();
            if let Segment::Highlight(h) = seg {
                intervals.push((h.ordinal, offset..offset + len));
            }
            offset += len;
        }
        intervals
    }

    /// Replace the whole buffer from a markup string (typing sync, load).
    pub fn set_markup(&mut self, content: &str) {
        self.segments = markup::parse(content);
        self.renumber();
    }

    /// Replace the whole buffer with raw text, verbatim. No markup
    /// parsing, so imported angle brackets stay text.
    pub fn set_plain_text(&mut self, text: &str) {
        self.segments = if text.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Text(text.to_string())]
        };
        self.renumber();
    }

    /// Reassign every highlight's ordinal and color from document order.
    ///
    /// The single authority for both fields: `ordinal = index + 1`,
    /// `color_class = index % PALETTE_SIZE`. Idempotent.
    pub fn renumber(&mut self) {
        let mut index = 0usize;
        for seg in &mut self.segments {
            if let Segment::Highlight(h) = seg {
                h.ordinal = index + 1;
                h.color_class = index % PALETTE_SIZE;
                index += 1;
            }
        }
    }

    /// Check a candidate selection without mutating anything.
    pub fn validate_selection(&self, range: &Range<usize>) -> Result<(), HighlightError> {
        if range.start >= range.end {
            return Err(HighlightError::EmptySelection);
        }
        let text = self.visible_text();
        let len = text.chars().count();
        if range.end > len {
            return Err(HighlightError::OutOfBounds {
                end: range.end,
                len,
            });
        }
        let selected_all_whitespace = text
            .chars()
            .skip(range.start)
            .take(range.end - range.start)
            .all(char::is_whitespace);
        if selected_all_whitespace {
            return Err(HighlightError::EmptySelection);
        }
        for (_, interval) in self.highlight_intervals() {
            if range.start < interval.end && interval.start < range.end {
                return Err(HighlightError::Overlap);
            }
        }
        Ok(())
    }

    /// Wrap the selected run in a new highlight.
    ///
    /// On success the color cursor advances and a full renumber runs, so
    /// the new highlight's final color comes from its position, not the
    /// cursor.
    pub fn create_highlight(&mut self, range: Range<usize>) -> Result<(), HighlightError> {
        self.validate_selection(&range)?;

        let line = self
            .visible_text()
            .chars()
            .take(range.start)
            .filter(|&c| c == '\n')
            .count();

        let mut offset = 0usize;
        for i in 0..self.segments.len() {
            let seg_len = self.segments[i].visible_len();
            let within = range.start >= offset && range.end <= offset + seg_len;
            if within {
                if let Segment::Text(text) = &self.segments[i] {
                    let local = (range.start - offset)..(range.end - offset);
                    let (before, selected, after) = split_chars(text, &local);
                    let mut replacement = Vec::with_capacity(3);
                    if !before.is_empty() {
                        replacement.push(Segment::Text(before));
                    }
                    replacement.push(Segment::Highlight(Highlight {
                        ordinal: 0,
                        color_class: self.color_cursor,
                        text: selected,
                    }));
                    if !after.is_empty() {
                        replacement.push(Segment::Text(after));
                    }
                    self.segments.splice(i..=i, replacement);

                    self.last_highlight_line = line;
                    self.color_cursor = (self.color_cursor + 1) % PALETTE_SIZE;
                    self.renumber();
                    return Ok(());
                }
            }
            offset += seg_len;
        }

        // A validated range that lands in no single text run straddles a
        // highlight boundary.
        Err(HighlightError::Overlap)
    }

    /// Unwrap a highlight, splicing its text back into the buffer.
    ///
    /// The color cursor steps back by one regardless of which highlight
    /// was removed (it tracks count, not identity); the renumber pass
    /// recolors the survivors.
    pub fn remove_highlight(&mut self, ordinal: usize) -> Result<(), HighlightError> {
        let index = self
            .segments
            .iter()
            .position(|seg| matches!(seg, Segment::Highlight(h) if h.ordinal == ordinal))
            .ok_or(HighlightError::UnknownOrdinal(ordinal))?;

        let inner = match self.segments.remove(index) {
            Segment::Highlight(h) => h.text,
            Segment::Text(t) => t,
        };
        self.segments.insert(index, Segment::Text(inner));
        markup::normalize(&mut self.segments);

        self.color_cursor = (self.color_cursor + PALETTE_SIZE - 1) % PALETTE_SIZE;
        self.renumber();
        Ok(())
    }
}

/// Split at char offsets (the buffer coordinate space is chars, not bytes).
fn split_chars(text: &str, local: &Range<usize>) -> (String, String, String) {
    let byte_at = |char_idx: usize| {
        text.char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(text.len())
    };
    let start = byte_at(local.start);
    let end = byte_at(local.end);
    (
        text[..start].to_string(),
        text[start..end].to_string(),
        text[end..].to_string(),
    )
}
