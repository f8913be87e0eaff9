use std::time::{Duration, Instant};

/// How long a status message stays on screen.
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

/// Cursor, selection anchor, and scroll for one pane.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PaneView {
    /// Char offset of the cursor in the pane's visible text
    pub(crate) cursor: usize,
    /// Selection anchor; Some while a selection is being made
    pub(crate) anchor: Option<usize>,
    /// First visible line
    pub(crate) scroll: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

/// Transient message shown in the status bar.
#[derive(Debug, Clone)]
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) kind: StatusKind,
    pub(crate) at: Instant,
}

impl StatusMessage {
    pub(crate) fn expired(&self) -> bool {
        self.at.elapsed() > STATUS_TTL
    }
}
