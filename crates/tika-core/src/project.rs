//! Project persistence and export
//!
//! The persisted record keeps the legacy JSON shape so documents written
//! by earlier releases restore cleanly: camelCase field names, and a
//! `lastHighlightLine` field that the first generation of the format did
//! not have (its absence reads as 0).

use crate::pane::PaneState;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default file name for an exported project document.
pub const PROJECT_EXPORT_FILE: &str = "kalidasa_project.json";

/// Default file name for an exported alignment mapping.
pub const MAPPINGS_EXPORT_FILE: &str = "verse_mappings.json";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed project document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One pane's persisted form.
///
/// Every field is defaulted: a record that carries only `content` (or
/// nothing at all for a side that was never touched) still restores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneRecord {
    pub content: String,
    #[serde(rename = "colorIndex")]
    pub color_index: usize,
    #[serde(rename = "lastHighlightLine")]
    pub last_highlight_line: usize,
}

impl PaneRecord {
    pub fn from_pane(pane: &PaneState) -> Self {
        Self {
            content: pane.markup(),
            color_index: pane.color_cursor,
            last_highlight_line: pane.last_highlight_line,
        }
    }

    /// Rebuild the live pane; always renumbers (stored numbering may be
    /// stale relative to edits made through other paths).
    pub fn to_pane(&self) -> PaneState {
        PaneState::from_markup(&self.content, self.color_index, self.last_highlight_line)
    }
}

/// The full persisted state: one record per side. Both sides are
/// required; a document missing either is malformed and rejected whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub source: PaneRecord,
    pub translation: PaneRecord,
}

impl ProjectRecord {
    /// Parse a project document, validating before anything is replaced.
    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let record = serde_json::from_str(json)?;
        Ok(record)
    }

    pub fn to_json(&self) -> String {
        // Serialization of these plain records cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// One entry of the exported alignment mapping: the i-th highlight of
/// each pane, paired by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseMapping {
    pub map_id: usize,
    pub sanskrit: String,
    pub english: String,
}

/// Visible highlight text prepared for the alignment export: lines
/// trimmed, blank lines dropped.
pub fn mapping_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize an alignment mapping the way the download expects it:
/// pretty-printed, ordered.
pub fn mappings_to_json(mappings: &[VerseMapping]) -> String {
    serde_json::to_string_pretty(mappings).unwrap_or_default()
}

/// Durable storage for the session under one fixed path.
///
/// The same path serves save and load; a missing file restores to the
/// empty session rather than erroring.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored record, or None when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<ProjectRecord>, ProjectError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(ProjectRecord::from_json(&json)?))
    }

    pub fn save(&self, record: &ProjectRecord) -> Result<(), ProjectError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, record.to_json())?;
        Ok(())
    }
}
