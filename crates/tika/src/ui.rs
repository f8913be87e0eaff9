//! UI rendering for the TUI

use crate::app::{App, StatusKind};
use crate::views::render_split;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tika_core::Side;
use unicode_width::UnicodeWidthStr;

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_split(frame, app, chunks[0]);
    draw_status_bar(frame, app, chunks[1]);

    if app.show_help {
        draw_help_popover(frame);
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let available_width = area.width as usize;

    let store_name = app
        .store
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| app.store.path().display().to_string());

    // LEFT: app tag + store + dirty marker
    let mut left_spans = vec![
        Span::styled(
            " TIKA ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(store_name, Style::default().fg(Color::DarkGray)),
    ];
    if app.session.is_dirty() {
        left_spans.push(Span::styled(" ●", Style::default().fg(Color::Yellow)));
    }

    // CENTER: transient message, else the key hint
    let center_spans = match app.status_line() {
        Some(message) => {
            let style = match message.kind {
                StatusKind::Info => Style::default().fg(Color::Cyan),
                StatusKind::Error => Style::default().fg(Color::Red),
            };
            vec![Span::styled(message.text.clone(), style)]
        }
        None => vec![Span::styled(
            "v select · enter highlight · x remove · u undo · ? help",
            Style::default().fg(Color::DarkGray),
        )],
    };

    // RIGHT: per-pane highlight counts + undo depth
    let right_spans = vec![
        Span::styled(
            format!("sa {}", app.session.pane(Side::Source).highlight_count()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(" · ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("en {}", app.session.pane(Side::Translation).highlight_count()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(" · ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("undo {}", app.session.history_len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" "),
    ];

    let width = |spans: &[Span]| -> usize {
        spans.iter().map(|s| s.content.as_ref().width()).sum()
    };
    let left_width = width(&left_spans);
    let center_width = width(&center_spans);
    let right_width = width(&right_spans);

    // Center the middle section; push the right section to the edge.
    let center_start = (available_width / 2).saturating_sub(center_width / 2);
    let left_pad = center_start.saturating_sub(left_width);
    let right_pad = available_width
        .saturating_sub(center_start + center_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(left_pad.max(1))));
    spans.extend(center_spans);
    spans.push(Span::raw(" ".repeat(right_pad.max(1))));
    spans.extend(right_spans);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_popover(frame: &mut Frame) {
    let area = centered_rect(48, 17, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::raw(""),
        help_line("Tab", "switch pane"),
        help_line("←↓↑→ / h j k l", "move cursor"),
        help_line("0 / $  ·  g / G", "line start/end · top/bottom"),
        help_line("v", "start or drop a selection"),
        help_line("Enter / H", "highlight the selection"),
        help_line("x / Del", "remove highlight at cursor"),
        help_line("u / Ctrl+Z", "undo"),
        help_line("Ctrl+S", "save project"),
        help_line("E", "export kalidasa_project.json"),
        help_line("M", "export verse_mappings.json"),
        help_line("q / Esc", "quit"),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Keys ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, area);
}

fn help_line(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{key:<17}"), Style::default().fg(Color::Cyan)),
        Span::raw(action.to_string()),
    ])
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
