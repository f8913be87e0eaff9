use super::split::pane_lines;
use ratatui::style::{Color, Modifier};
use ratatui::text::Line;
use tika_core::{PaneState, PALETTE_SIZE};

const PALETTE: [Color; PALETTE_SIZE] = [Color::Yellow, Color::Green, Color::Blue];

fn pane_with(text: &str) -> PaneState {
    let mut pane = PaneState::new();
    pane.set_plain_text(text);
    pane
}

fn line_text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[test]
fn test_plain_text_splits_into_lines() {
    let pane = pane_with("one\ntwo\nthree");
    let lines = pane_lines(&pane, None, None, &PALETTE);
    assert_eq!(lines.len(), 3);
    assert_eq!(line_text(&lines[0]), "one");
    assert_eq!(line_text(&lines[2]), "three");
}

#[test]
fn test_trailing_newline_opens_empty_line() {
    let pane = pane_with("a\n");
    let lines = pane_lines(&pane, None, None, &PALETTE);
    assert_eq!(lines.len(), 2);
    assert_eq!(line_text(&lines[1]), "");
}

#[test]
fn test_highlight_markers_rendered() {
    let mut pane = pane_with("one two");
    pane.create_highlight(4..7).unwrap();
    let lines = pane_lines(&pane, None, None, &PALETTE);
    assert_eq!(lines.len(), 1);
    assert_eq!(line_text(&lines[0]), "one [1]two×");
}

#[test]
fn test_badges_follow_document_order() {
    let mut pane = pane_with("alpha beta");
    pane.create_highlight(6..10).unwrap();
    pane.create_highlight(0..5).unwrap();
    let lines = pane_lines(&pane, None, None, &PALETTE);
    assert_eq!(line_text(&lines[0]), "[1]alpha× [2]beta×");
}

#[test]
fn test_highlight_background_uses_palette_slot() {
    let mut pane = pane_with("a b c");
    pane.create_highlight(0..1).unwrap();
    pane.create_highlight(2..3).unwrap();
    let lines = pane_lines(&pane, None, None, &PALETTE);
    let backgrounds: Vec<Option<Color>> = lines[0]
        .spans
        .iter()
        .filter(|s| s.content == "a" || s.content == "b")
        .map(|s| s.style.bg)
        .collect();
    assert_eq!(backgrounds, vec![Some(Color::Yellow), Some(Color::Green)]);
}

#[test]
fn test_selection_reverses_spans() {
    let pane = pane_with("abcd");
    let lines = pane_lines(&pane, Some(1..3), None, &PALETTE);
    let selected: String = lines[0]
        .spans
        .iter()
        .filter(|s| s.style.add_modifier.contains(Modifier::REVERSED))
        .map(|s| s.content.as_ref())
        .collect();
    assert_eq!(selected, "bc");
}

#[test]
fn test_cursor_past_end_gets_a_cell() {
    let pane = pane_with("ab");
    let lines = pane_lines(&pane, None, Some(2), &PALETTE);
    assert_eq!(lines.len(), 1);
    let last = lines[0].spans.last().unwrap();
    assert_eq!(last.content.as_ref(), " ");
    assert_eq!(last.style.bg, Some(Color::White));
}

#[test]
fn test_cursor_inside_text_restyles_one_cell() {
    let pane = pane_with("abc");
    let lines = pane_lines(&pane, None, Some(1), &PALETTE);
    let cursor_spans: Vec<&str> = lines[0]
        .spans
        .iter()
        .filter(|s| s.style.bg == Some(Color::White))
        .map(|s| s.content.as_ref())
        .collect();
    assert_eq!(cursor_spans, vec!["b"]);
}

#[test]
fn test_empty_pane_still_yields_one_line() {
    let pane = pane_with("");
    let lines = pane_lines(&pane, None, None, &PALETTE);
    assert_eq!(lines.len(), 1);
    assert_eq!(line_text(&lines[0]), "");
}
