//! Dual-pane annotation view

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::ops::Range;
use tika_core::{PaneState, Segment, Side, PALETTE_SIZE};

/// Render the two panes side by side.
pub fn render_split(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_pane(frame, app, Side::Source, chunks[0]);
    render_pane(frame, app, Side::Translation, chunks[1]);
}

fn render_pane(frame: &mut Frame, app: &mut App, side: Side, area: Rect) {
    let focused = app.focus == side;
    // Inner height excludes the top and bottom border rows.
    let inner_height = area.height.saturating_sub(2) as usize;
    app.ensure_cursor_visible(side, inner_height);

    let pane = app.session.pane(side);
    let title = format!(
        " {} · {} · next {} ",
        side.title(),
        pane.highlight_count(),
        app.next_color_name(side)
    );
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);

    if pane.is_empty() {
        let placeholder = Line::from(Span::styled(
            "empty: import a text with tika <source> [translation]",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(placeholder).block(block), area);
        return;
    }

    let selection = app.selection_range(side);
    let cursor = if focused {
        Some(app.view(side).cursor)
    } else {
        None
    };
    let scroll = app.view(side).scroll as u16;

    let mut lines = pane_lines(pane, selection, cursor, &app.palette);
    if app.show_gutter {
        let gutter_style = Style::default().fg(Color::DarkGray);
        for (i, line) in lines.iter_mut().enumerate() {
            line.spans
                .insert(0, Span::styled(format!("{:4} ", i + 1), gutter_style));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Build one pane's display lines from its buffer.
///
/// Highlight runs get their palette background plus the derived markers
/// the buffer itself never stores: an `[n]` ordinal badge before the run
/// and a `×` delete affordance after it. Selection and cursor are overlay
/// styles on the visible-text coordinate space.
pub(crate) fn pane_lines(
    pane: &PaneState,
    selection: Option<Range<usize>>,
    cursor: Option<usize>,
    palette: &[Color; PALETTE_SIZE],
) -> Vec<Line<'static>> {
    let marker_style = Style::default().fg(Color::DarkGray);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    let mut offset = 0usize;

    let overlay = |offset: usize, base: Style| -> Style {
        let mut style = base;
        if selection.as_ref().is_some_and(|r| r.contains(&offset)) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if cursor == Some(offset) {
            style = style.bg(Color::White).fg(Color::Black);
        }
        style
    };

    for seg in pane.segments() {
        let (base, highlight) = match seg {
            Segment::Text(_) => (Style::default(), None),
            Segment::Highlight(h) => (
                Style::default()
                    .bg(palette[h.color_class % PALETTE_SIZE])
                    .fg(Color::Black),
                Some(h.ordinal),
            ),
        };

        if let Some(ordinal) = highlight {
            flush(&mut spans, &mut run, run_style);
            spans.push(Span::styled(format!("[{ordinal}]"), marker_style));
        }

        for c in seg.visible_str().chars() {
            if c == '\n' {
                let style = overlay(offset, base);
                if style != base {
                    // The break itself is selected or under the cursor:
                    // show it as one trailing cell.
                    flush(&mut spans, &mut run, run_style);
                    spans.push(Span::styled(" ".to_string(), style));
                }
                flush(&mut spans, &mut run, run_style);
                lines.push(Line::from(std::mem::take(&mut spans)));
            } else {
                let style = overlay(offset, base);
                if style != run_style {
                    flush(&mut spans, &mut run, run_style);
                    run_style = style;
                }
                run.push(c);
            }
            offset += 1;
        }

        if highlight.is_some() {
            flush(&mut spans, &mut run, run_style);
            spans.push(Span::styled("×".to_string(), marker_style));
        }
    }

    // Cursor resting past the last character gets its own cell.
    let end_style = overlay(offset, Style::default());
    if end_style != Style::default() {
        flush(&mut spans, &mut run, run_style);
        spans.push(Span::styled(" ".to_string(), end_style));
    }
    flush(&mut spans, &mut run, run_style);
    lines.push(Line::from(spans));
    lines
}

fn flush(spans: &mut Vec<Span<'static>>, run: &mut String, style: Style) {
    if !run.is_empty() {
        spans.push(Span::styled(std::mem::take(run), style));
    }
}
