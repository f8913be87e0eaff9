//! Application state and logic

use crate::config::Config;
use ratatui::style::Color;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tika_core::{
    ProjectStore, Session, Side, MAPPINGS_EXPORT_FILE, PALETTE_NAMES, PALETTE_SIZE,
    PROJECT_EXPORT_FILE,
};

#[cfg(test)]
mod tests;
mod types;
mod utils;

pub(crate) use types::{PaneView, StatusKind, StatusMessage};
use utils::{char_len, line_col, line_starts, next_boundary, offset_at, prev_boundary};

/// The main application state
pub struct App {
    /// Annotation session: both panes plus their shared history
    pub session: Session,
    /// Durable store backing save and autosave
    pub store: ProjectStore,
    /// Pane with input focus
    pub focus: Side,
    /// Cursor/selection/scroll per side, source first
    views: [PaneView; 2],
    /// Persist after every successful mutation
    pub autosave: bool,
    /// Show the line-number gutter
    pub show_gutter: bool,
    /// Palette colors in slot order
    pub palette: [Color; PALETTE_SIZE],
    /// Transient status-bar message
    pub(crate) status: Option<StatusMessage>,
    /// Whether to show the help popover
    pub show_help: bool,
    /// Whether to quit
    pub should_quit: bool,
    /// Directory receiving exported documents
    pub export_dir: PathBuf,
}

fn view_index(side: Side) -> usize {
    match side {
        Side::Source => 0,
        Side::Translation => 1,
    }
}

impl App {
    pub fn new(session: Session, store: ProjectStore, config: &Config) -> Self {
        let mut views = [PaneView::default(); 2];
        // Land each pane on its last-recorded highlight line.
        for side in Side::BOTH {
            views[view_index(side)].scroll = session.pane(side).last_highlight_line;
        }
        Self {
            session,
            store,
            focus: Side::Source,
            views,
            autosave: config.files.autosave,
            show_gutter: config.ui.gutter,
            palette: config.ui.palette.resolve(),
            status: None,
            show_help: false,
            should_quit: false,
            export_dir: std::env::current_dir().unwrap_or_default(),
        }
    }

    pub(crate) fn view(&self, side: Side) -> &PaneView {
        &self.views[view_index(side)]
    }

    fn view_mut(&mut self, side: Side) -> &mut PaneView {
        &mut self.views[view_index(side)]
    }

    fn focused_text(&self) -> String {
        self.session.pane(self.focus).visible_text()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn switch_focus(&mut self) {
        self.focus = self.focus.other();
    }

    /// Name of the palette slot the next highlight on `side` starts from.
    pub fn next_color_name(&self, side: Side) -> &'static str {
        PALETTE_NAMES[self.session.pane(side).color_cursor % PALETTE_SIZE]
    }

    // ==================== Cursor & Selection ====================

    pub fn move_left(&mut self) {
        let text = self.focused_text();
        let view = self.view_mut(self.focus);
        view.cursor = prev_boundary(&text, view.cursor);
    }

    pub fn move_right(&mut self) {
        let text = self.focused_text();
        let view = self.view_mut(self.focus);
        if view.cursor < char_len(&text) {
            view.cursor = next_boundary(&text, view.cursor);
        }
    }

    pub fn move_up(&mut self) {
        self.move_lines(-1);
    }

    pub fn move_down(&mut self) {
        self.move_lines(1);
    }

    pub fn page_up(&mut self, lines: usize) {
        self.move_lines(-(lines.max(1) as isize));
    }

    pub fn page_down(&mut self, lines: usize) {
        self.move_lines(lines.max(1) as isize);
    }

    fn move_lines(&mut self, delta: isize) {
        let text = self.focused_text();
        let starts = line_starts(&text);
        let view = self.view_mut(self.focus);
        let (line, col) = line_col(&starts, view.cursor);
        let target = line.saturating_add_signed(delta).min(starts.len() - 1);
        view.cursor = offset_at(&starts, char_len(&text), target, col);
    }

    pub fn move_line_start(&mut self) {
        let text = self.focused_text();
        let starts = line_starts(&text);
        let view = self.view_mut(self.focus);
        let (line, _) = line_col(&starts, view.cursor);
        view.cursor = starts[line];
    }

    pub fn move_line_end(&mut self) {
        let text = self.focused_text();
        let starts = line_starts(&text);
        let len = char_len(&text);
        let view = self.view_mut(self.focus);
        let (line, _) = line_col(&starts, view.cursor);
        view.cursor = offset_at(&starts, len, line, usize::MAX);
    }

    pub fn move_top(&mut self) {
        self.view_mut(self.focus).cursor = 0;
    }

    pub fn move_bottom(&mut self) {
        let len = char_len(&self.focused_text());
        self.view_mut(self.focus).cursor = len;
    }

    /// Start a selection at the cursor, or drop the one in progress.
    pub fn toggle_anchor(&mut self) {
        let view = self.view_mut(self.focus);
        view.anchor = match view.anchor {
            Some(_) => None,
            None => Some(view.cursor),
        };
    }

    pub fn clear_selection(&mut self) {
        self.view_mut(self.focus).anchor = None;
    }

    pub fn has_selection(&self) -> bool {
        self.view(self.focus).anchor.is_some()
    }

    /// The selected char range, cursor-inclusive: anchoring and moving
    /// one cell selects two characters.
    pub(crate) fn selection_range(&self, side: Side) -> Option<Range<usize>> {
        let view = self.view(side);
        let anchor = view.anchor?;
        let len = char_len(&self.session.pane(side).visible_text());
        let start = anchor.min(view.cursor);
        let end = (anchor.max(view.cursor) + 1).min(len);
        if start >= end {
            return None;
        }
        Some(start..end)
    }

    /// Ordinal of the highlight whose span contains `offset`.
    pub(crate) fn highlight_at(&self, side: Side, offset: usize) -> Option<usize> {
        self.session
            .pane(side)
            .highlight_intervals()
            .into_iter()
            .find(|(_, interval)| interval.contains(&offset))
            .map(|(ordinal, _)| ordinal)
    }

    // ==================== Annotation intents ====================

    /// Wrap the current selection in a highlight.
    pub fn create_highlight(&mut self) {
        let side = self.focus;
        let Some(range) = self.selection_range(side) else {
            self.error("nothing selected: press v, then move the cursor");
            return;
        };
        match self.session.create_highlight(side, range) {
            Ok(()) => {
                self.view_mut(side).anchor = None;
                let count = self.session.pane(side).highlight_count();
                self.info(format!("{}: {} highlights", side.title(), count));
                self.after_mutation();
            }
            Err(err) => self.error(err.to_string()),
        }
    }

    /// Remove the highlight under the cursor.
    pub fn remove_highlight(&mut self) {
        let side = self.focus;
        let cursor = self.view(side).cursor;
        let Some(ordinal) = self.highlight_at(side, cursor) else {
            self.error("no highlight under the cursor");
            return;
        };
        match self.session.remove_highlight(side, ordinal) {
            Ok(()) => {
                self.info(format!("removed highlight #{ordinal}"));
                self.after_mutation();
            }
            Err(err) => self.error(err.to_string()),
        }
    }

    pub fn undo(&mut self) {
        if self.session.undo() {
            self.info("undid last action");
            self.after_mutation();
        } else {
            self.info("nothing to undo");
        }
    }

    // ==================== Persistence & export ====================

    pub fn save(&mut self) {
        match self.store.save(&self.session.to_record()) {
            Ok(()) => {
                self.session.mark_clean();
                self.info(format!("saved {}", self.store.path().display()));
            }
            Err(err) => self.error(format!("save failed: {err}")),
        }
    }

    pub fn export_project(&mut self) {
        let path = self.export_dir.join(PROJECT_EXPORT_FILE);
        self.export_project_to(&path);
    }

    pub fn export_project_to(&mut self, path: &Path) {
        match std::fs::write(path, self.session.to_record().to_json_pretty()) {
            Ok(()) => self.info(format!("exported project to {}", path.display())),
            Err(err) => self.error(format!("export failed: {err}")),
        }
    }

    pub fn export_mappings(&mut self) {
        let path = self.export_dir.join(MAPPINGS_EXPORT_FILE);
        self.export_mappings_to(&path);
    }

    pub fn export_mappings_to(&mut self, path: &Path) {
        let mappings = self.session.alignment();
        let json = tika_core::project::mappings_to_json(&mappings);
        match std::fs::write(path, json) {
            Ok(()) => self.info(format!(
                "exported {} mappings to {}",
                mappings.len(),
                path.display()
            )),
            Err(err) => self.error(format!("export failed: {err}")),
        }
    }

    /// Persist and tidy cursors once a mutation has landed. The
    /// persistence write strictly follows the mutation it captures.
    fn after_mutation(&mut self) {
        self.clamp_views();
        if self.autosave {
            if let Err(err) = self.store.save(&self.session.to_record()) {
                self.error(format!("autosave failed: {err}"));
            } else {
                self.session.mark_clean();
            }
        }
    }

    /// Undo and imports can shrink a pane under its cursor.
    fn clamp_views(&mut self) {
        for side in Side::BOTH {
            let len = char_len(&self.session.pane(side).visible_text());
            let view = self.view_mut(side);
            view.cursor = view.cursor.min(len);
            if view.anchor.is_some_and(|a| a > len) {
                view.anchor = None;
            }
        }
    }

    // ==================== Status & scrolling ====================

    pub(crate) fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
            at: Instant::now(),
        });
    }

    pub(crate) fn error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Error,
            at: Instant::now(),
        });
    }

    pub(crate) fn status_line(&self) -> Option<&StatusMessage> {
        self.status.as_ref().filter(|message| !message.expired())
    }

    /// Keep the cursor line inside the viewport; called during render
    /// with the pane's inner height.
    pub(crate) fn ensure_cursor_visible(&mut self, side: Side, height: usize) {
        if height == 0 {
            return;
        }
        let text = self.session.pane(side).visible_text();
        let starts = line_starts(&text);
        let total_lines = starts.len();
        let cursor = self.view(side).cursor.min(char_len(&text));
        let (line, _) = line_col(&starts, cursor);
        let view = self.view_mut(side);
        if line < view.scroll {
            view.scroll = line;
        } else if line >= view.scroll + height {
            view.scroll = line + 1 - height;
        }
        view.scroll = view.scroll.min(total_lines.saturating_sub(1));
    }
}
