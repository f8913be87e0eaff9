//! Annotation session: both panes plus their shared history
//!
//! A [`Session`] is the single owner of all mutable annotation state. The
//! application root holds one and passes it `&mut` into every operation;
//! there are no globals. Operations run to completion: a snapshot always
//! happens before the mutation it guards, and a rejection mutates nothing
//! and consumes no snapshot.

use crate::history::{History, Snapshot};
use crate::pane::{HighlightError, PaneState};
use crate::project::{self, PaneRecord, ProjectRecord, VerseMapping};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Which pane an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Translation,
}

impl Side {
    /// Both sides, source first.
    pub const BOTH: [Side; 2] = [Side::Source, Side::Translation];

    pub fn other(self) -> Side {
        match self {
            Side::Source => Side::Translation,
            Side::Translation => Side::Source,
        }
    }

    /// Display title for a pane.
    pub fn title(self) -> &'static str {
        match self {
            Side::Source => "Sanskrit",
            Side::Translation => "English",
        }
    }
}

/// The annotation session: two panes and the undo history spanning them.
#[derive(Debug, Clone, Default)]
pub struct Session {
    source: PaneState,
    translation: PaneState,
    history: History,
    dirty: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a session from a persisted record, renumbering both panes
    /// (stored numbering may be stale).
    pub fn from_record(record: &ProjectRecord) -> Self {
        Self {
            source: record.source.to_pane(),
            translation: record.translation.to_pane(),
            history: History::new(),
            dirty: false,
        }
    }

    pub fn pane(&self, side: Side) -> &PaneState {
        match side {
            Side::Source => &self.source,
            Side::Translation => &self.translation,
        }
    }

    fn pane_mut(&mut self, side: Side) -> &mut PaneState {
        match side {
            Side::Source => &mut self.source,
            Side::Translation => &mut self.translation,
        }
    }

    /// Capture both panes onto the history stack.
    ///
    /// Create/remove/import call this internally; surfaces call it on the
    /// transition into editing (first focus), so a typing burst undoes as
    /// one action rather than one keystroke.
    pub fn snapshot(&mut self) {
        self.history.push(Snapshot {
            source: self.source.clone(),
            translation: self.translation.clone(),
        });
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// True when state has mutated since the surface last persisted it.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Wrap a selected run of one pane in a new highlight.
    ///
    /// The range is validated first; a rejection leaves the session
    /// untouched with no snapshot consumed.
    pub fn create_highlight(
        &mut self,
        side: Side,
        range: Range<usize>,
    ) -> Result<(), HighlightError> {
        self.pane(side).validate_selection(&range)?;
        self.snapshot();
        self.pane_mut(side).create_highlight(range)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove one pane's highlight by ordinal, splicing its text back.
    pub fn remove_highlight(&mut self, side: Side, ordinal: usize) -> Result<(), HighlightError> {
        if self.pane(side).highlight(ordinal).is_none() {
            return Err(HighlightError::UnknownOrdinal(ordinal));
        }
        self.snapshot();
        self.pane_mut(side).remove_highlight(ordinal)?;
        self.dirty = true;
        Ok(())
    }

    /// Sync one pane from an editing surface's markup after a typing
    /// burst. No snapshot (the transition into editing took it), but
    /// typing can delete highlight nodes wholesale, so this renumbers.
    pub fn apply_edit(&mut self, side: Side, markup: &str) {
        self.pane_mut(side).set_markup(markup);
        self.dirty = true;
    }

    /// Replace one pane's content with raw text (plain-text import).
    pub fn import_text(&mut self, side: Side, text: &str) {
        self.snapshot();
        self.pane_mut(side).set_plain_text(text);
        self.dirty = true;
    }

    /// Replace the whole session from an imported project document.
    /// Undoable: the prior state is snapshotted first.
    pub fn import_project(&mut self, record: &ProjectRecord) {
        self.snapshot();
        self.source = record.source.to_pane();
        self.translation = record.translation.to_pane();
        self.dirty = true;
    }

    /// Restore both panes from the most recent snapshot. Returns false
    /// (and does nothing) when there is no history.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => {
                self.source = snapshot.source;
                self.translation = snapshot.translation;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// The persisted wire form of the session.
    pub fn to_record(&self) -> ProjectRecord {
        ProjectRecord {
            source: PaneRecord::from_pane(&self.source),
            translation: PaneRecord::from_pane(&self.translation),
        }
    }

    /// Zip the two panes' highlights by position into the alignment
    /// mapping. Highlights past the shorter side are silently excluded;
    /// zero highlights on either side yields an empty mapping.
    pub fn alignment(&self) -> Vec<VerseMapping> {
        let source: Vec<&str> = self.source.highlights().map(|h| h.text.as_str()).collect();
        let translation: Vec<&str> = self
            .translation
            .highlights()
            .map(|h| h.text.as_str())
            .collect();
        source
            .iter()
            .zip(translation.iter())
            .enumerate()
            .map(|(i, (sanskrit, english))| VerseMapping {
                map_id: i + 1,
                sanskrit: project::mapping_text(sanskrit),
                english: project::mapping_text(english),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_CAPACITY;

    fn session_with(source: &str, translation: &str) -> Session {
        let mut session = Session::new();
        session.import_text(Side::Source, source);
        session.import_text(Side::Translation, translation);
        session
    }

    #[test]
    fn test_sides_are_independent() {
        let mut session = session_with("agni vayu", "fire wind");
        session.create_highlight(Side::Source, 0..4).unwrap();
        assert_eq!(session.pane(Side::Source).highlight_count(), 1);
        assert_eq!(session.pane(Side::Translation).highlight_count(), 0);
        assert_eq!(session.pane(Side::Translation).color_cursor, 0);
    }

    #[test]
    fn test_undo_restores_both_panes_byte_for_byte() {
        let mut session = session_with("agni vayu", "fire wind");
        session.create_highlight(Side::Source, 0..4).unwrap();
        session.create_highlight(Side::Translation, 0..4).unwrap();
        let before = session.to_record();

        session.create_highlight(Side::Source, 5..9).unwrap();
        assert_ne!(session.to_record(), before);

        assert!(session.undo());
        assert_eq!(session.to_record(), before);
    }

    #[test]
    fn test_undo_restores_color_cursor() {
        let mut session = session_with("a b c", "x");
        session.create_highlight(Side::Source, 0..1).unwrap();
        session.create_highlight(Side::Source, 2..3).unwrap();
        assert_eq!(session.pane(Side::Source).color_cursor, 2);
        session.undo();
        assert_eq!(session.pane(Side::Source).color_cursor, 1);
    }

    #[test]
    fn test_undo_underflow_is_noop() {
        let mut session = Session::new();
        assert!(!session.undo());
        assert_eq!(session.pane(Side::Source).visible_text(), "");
    }

    #[test]
    fn test_rejection_consumes_no_snapshot() {
        let mut session = session_with("agni vayu", "fire");
        session.create_highlight(Side::Source, 0..4).unwrap();
        let depth = session.history_len();

        assert_eq!(
            session.create_highlight(Side::Source, 2..6),
            Err(HighlightError::Overlap)
        );
        assert_eq!(session.history_len(), depth);

        assert_eq!(
            session.remove_highlight(Side::Source, 9),
            Err(HighlightError::UnknownOrdinal(9))
        );
        assert_eq!(session.history_len(), depth);
    }

    #[test]
    fn test_history_bounded_at_capacity() {
        let mut session = Session::new();
        for n in 0..35 {
            session.import_text(Side::Source, &format!("text {n}"));
        }
        assert_eq!(session.history_len(), HISTORY_CAPACITY);

        let mut undos = 0;
        while session.undo() {
            undos += 1;
        }
        assert_eq!(undos, HISTORY_CAPACITY);
        // 30 undos from "text 34" land on "text 4".
        assert_eq!(session.pane(Side::Source).visible_text(), "text 4");
    }

    #[test]
    fn test_import_project_is_undoable() {
        let mut session = session_with("old source", "old translation");
        let original = session.to_record();

        let incoming = session_with("new source", "new translation").to_record();
        session.import_project(&incoming);
        assert_eq!(session.pane(Side::Source).visible_text(), "new source");

        assert!(session.undo());
        assert_eq!(session.to_record(), original);
    }

    #[test]
    fn test_alignment_zips_by_position() {
        let mut session = session_with("agni vayu", "fire wind extra");
        session.create_highlight(Side::Source, 0..4).unwrap(); // agni
        session.create_highlight(Side::Source, 5..9).unwrap(); // vayu
        session.create_highlight(Side::Translation, 0..4).unwrap(); // fire
        session.create_highlight(Side::Translation, 5..9).unwrap(); // wind
        session.create_highlight(Side::Translation, 10..15).unwrap(); // extra

        let mappings = session.alignment();
        assert_eq!(
            mappings,
            vec![
                VerseMapping {
                    map_id: 1,
                    sanskrit: "agni".to_string(),
                    english: "fire".to_string(),
                },
                VerseMapping {
                    map_id: 2,
                    sanskrit: "vayu".to_string(),
                    english: "wind".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_alignment_empty_side_yields_empty_mapping() {
        let mut session = session_with("agni", "");
        session.create_highlight(Side::Source, 0..4).unwrap();
        assert!(session.alignment().is_empty());
    }

    #[test]
    fn test_alignment_cleans_multiline_text() {
        let mut session = session_with("one\n  two  \n\nthree", "a b");
        session.create_highlight(Side::Source, 0..18).unwrap();
        session.create_highlight(Side::Translation, 0..3).unwrap();
        let mappings = session.alignment();
        assert_eq!(mappings[0].sanskrit, "one\ntwo\nthree");
    }

    #[test]
    fn test_dirty_tracking() {
        let mut session = Session::new();
        assert!(!session.is_dirty());
        session.import_text(Side::Source, "text");
        assert!(session.is_dirty());
        session.mark_clean();
        session.create_highlight(Side::Source, 0..4).unwrap();
        assert!(session.is_dirty());
    }

    #[test]
    fn test_apply_edit_renumbers_without_snapshot() {
        let mut session = session_with("a b c", "x");
        session.create_highlight(Side::Source, 0..1).unwrap();
        session.create_highlight(Side::Source, 4..5).unwrap();
        let depth = session.history_len();

        // The surface edited the buffer and dropped the first highlight.
        let markup = session.pane(Side::Source).markup();
        let edited = markup.replacen("<span class=\"hl-node hl-0\"><span class=\"hl-num\">1</span>a<span class=\"del-btn\"> × </span></span>", "a", 1);
        session.apply_edit(Side::Source, &edited);

        assert_eq!(session.history_len(), depth);
        let survivor: Vec<_> = session.pane(Side::Source).highlights().collect();
        assert_eq!(survivor.len(), 1);
        assert_eq!(survivor[0].ordinal, 1);
        assert_eq!(survivor[0].color_class, 0);
    }
}
