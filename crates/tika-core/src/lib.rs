//! tika-core: the annotation state engine for tika
//!
//! Two parallel text panes (a source text and its translation) carry
//! colored, numbered highlight spans that cycle through a fixed palette.
//! This crate owns the rules: how a buffer is mutated into an annotated
//! buffer, how ordinals and colors stay position-derived, how mutation
//! history is snapshotted for undo, and how annotated content round-trips
//! through serialization and the alignment export. Rendering, selection,
//! and key bindings live in the `tika` front-end.

pub mod history;
pub mod markup;
pub mod pane;
pub mod project;
pub mod session;

pub use history::{History, Snapshot, HISTORY_CAPACITY};
pub use markup::{Highlight, Segment};
pub use pane::{HighlightError, PaneState, PALETTE_NAMES, PALETTE_SIZE};
pub use project::{
    PaneRecord, ProjectError, ProjectRecord, ProjectStore, VerseMapping, MAPPINGS_EXPORT_FILE,
    PROJECT_EXPORT_FILE,
};
pub use session::{Session, Side};
