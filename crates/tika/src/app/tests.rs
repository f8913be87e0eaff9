use super::*;
use crate::config::{parse_hex_color, Config};
use tika_core::Side;

fn test_app(source: &str, translation: &str) -> App {
    let mut session = Session::new();
    if !source.is_empty() {
        session.import_text(Side::Source, source);
    }
    if !translation.is_empty() {
        session.import_text(Side::Translation, translation);
    }
    let store = ProjectStore::new(
        std::env::temp_dir().join(format!("tika-app-test-{}.json", std::process::id())),
    );
    let mut app = App::new(session, store, &Config::default());
    app.autosave = false;
    app
}

fn move_right_times(app: &mut App, n: usize) {
    for _ in 0..n {
        app.move_right();
    }
}

#[test]
fn test_selection_is_cursor_inclusive() {
    let mut app = test_app("agni vayu", "");
    app.toggle_anchor();
    move_right_times(&mut app, 3);
    assert_eq!(app.selection_range(Side::Source), Some(0..4));
}

#[test]
fn test_selection_works_backwards() {
    let mut app = test_app("agni vayu", "");
    move_right_times(&mut app, 3);
    app.toggle_anchor();
    app.move_left();
    app.move_left();
    assert_eq!(app.selection_range(Side::Source), Some(1..4));
}

#[test]
fn test_create_highlight_from_selection() {
    let mut app = test_app("agni vayu", "");
    app.toggle_anchor();
    move_right_times(&mut app, 3);
    app.create_highlight();

    let pane = app.session.pane(Side::Source);
    assert_eq!(pane.highlight_count(), 1);
    assert_eq!(pane.highlight(1).unwrap().text, "agni");
    assert!(!app.has_selection(), "selection clears after highlighting");
    assert!(matches!(
        app.status.as_ref().map(|s| s.kind),
        Some(StatusKind::Info)
    ));
}

#[test]
fn test_create_without_selection_reports() {
    let mut app = test_app("agni", "");
    app.create_highlight();
    assert_eq!(app.session.pane(Side::Source).highlight_count(), 0);
    assert!(matches!(
        app.status.as_ref().map(|s| s.kind),
        Some(StatusKind::Error)
    ));
}

#[test]
fn test_overlap_reported_and_pane_preserved() {
    let mut app = test_app("agni vayu", "");
    app.toggle_anchor();
    move_right_times(&mut app, 3);
    app.create_highlight();
    let markup_before = app.session.pane(Side::Source).markup();

    // Select 2..6, straddling the existing highlight's end.
    app.move_top();
    move_right_times(&mut app, 2);
    app.toggle_anchor();
    move_right_times(&mut app, 3);
    app.create_highlight();

    assert!(matches!(
        app.status.as_ref().map(|s| s.kind),
        Some(StatusKind::Error)
    ));
    assert_eq!(app.session.pane(Side::Source).highlight_count(), 1);
    assert_eq!(app.session.pane(Side::Source).markup(), markup_before);
}

#[test]
fn test_remove_highlight_under_cursor() {
    let mut app = test_app("agni vayu", "");
    app.toggle_anchor();
    move_right_times(&mut app, 3);
    app.create_highlight();

    app.move_top();
    app.move_right();
    app.remove_highlight();
    assert_eq!(app.session.pane(Side::Source).highlight_count(), 0);
    assert_eq!(app.session.pane(Side::Source).visible_text(), "agni vayu");
}

#[test]
fn test_remove_away_from_highlight_reports() {
    let mut app = test_app("agni vayu", "");
    app.toggle_anchor();
    move_right_times(&mut app, 3);
    app.create_highlight();

    app.move_bottom();
    app.remove_highlight();
    assert_eq!(app.session.pane(Side::Source).highlight_count(), 1);
    assert!(matches!(
        app.status.as_ref().map(|s| s.kind),
        Some(StatusKind::Error)
    ));
}

#[test]
fn test_highlight_at_uses_intervals() {
    let mut app = test_app("agni vayu", "");
    app.toggle_anchor();
    move_right_times(&mut app, 3);
    app.create_highlight();

    assert_eq!(app.highlight_at(Side::Source, 0), Some(1));
    assert_eq!(app.highlight_at(Side::Source, 3), Some(1));
    assert_eq!(app.highlight_at(Side::Source, 4), None);
}

#[test]
fn test_undo_clamps_cursor_and_anchor() {
    let mut app = test_app("ab", "");
    app.session.import_text(Side::Source, "a much longer replacement");
    app.move_bottom();
    app.toggle_anchor();
    assert_eq!(app.view(Side::Source).cursor, 25);

    app.undo();
    assert_eq!(app.session.pane(Side::Source).visible_text(), "ab");
    assert!(app.view(Side::Source).cursor <= 2);
    assert!(app.view(Side::Source).anchor.is_none());
}

#[test]
fn test_grapheme_motion_never_splits_clusters() {
    // 'a' + combining acute is one cluster of two chars
    let mut app = test_app("a\u{0301}b", "");
    app.move_right();
    assert_eq!(app.view(Side::Source).cursor, 2);
    app.move_right();
    assert_eq!(app.view(Side::Source).cursor, 3);
    app.move_left();
    assert_eq!(app.view(Side::Source).cursor, 2);
    app.move_left();
    assert_eq!(app.view(Side::Source).cursor, 0);
}

#[test]
fn test_vertical_motion_keeps_column() {
    let mut app = test_app("one\ntwo\nthree", "");
    move_right_times(&mut app, 2);
    app.move_down();
    assert_eq!(app.view(Side::Source).cursor, 6); // 'o' of "two"
    app.move_down();
    assert_eq!(app.view(Side::Source).cursor, 10); // 'r' of "three"
    app.move_up();
    app.move_up();
    assert_eq!(app.view(Side::Source).cursor, 2);
}

#[test]
fn test_line_end_stops_before_newline_of_next_line() {
    let mut app = test_app("one\ntwo\nthree", "");
    app.move_down();
    app.move_line_end();
    assert_eq!(app.view(Side::Source).cursor, 7);
    app.move_line_start();
    assert_eq!(app.view(Side::Source).cursor, 4);
}

#[test]
fn test_focus_switch_keeps_per_pane_cursors() {
    let mut app = test_app("agni", "fire and wind");
    move_right_times(&mut app, 2);
    app.switch_focus();
    assert_eq!(app.focus, Side::Translation);
    assert_eq!(app.view(Side::Translation).cursor, 0);
    move_right_times(&mut app, 4);
    app.switch_focus();
    assert_eq!(app.view(Side::Source).cursor, 2);
    assert_eq!(app.view(Side::Translation).cursor, 4);
}

#[test]
fn test_scroll_follows_cursor() {
    let lines: Vec<String> = (1..=40).map(|i| format!("line {i}")).collect();
    let mut app = test_app(&lines.join("\n"), "");

    for _ in 0..25 {
        app.move_down();
    }
    app.ensure_cursor_visible(Side::Source, 10);
    assert_eq!(app.view(Side::Source).scroll, 16);

    app.move_top();
    app.ensure_cursor_visible(Side::Source, 10);
    assert_eq!(app.view(Side::Source).scroll, 0);
}

#[test]
fn test_scroll_restored_from_last_highlight_line() {
    let mut session = Session::new();
    session.import_text(Side::Source, "a\nb\nc\nd\ne\nf");
    session.create_highlight(Side::Source, 8..9).unwrap(); // "e", line 4
    let store = ProjectStore::new(
        std::env::temp_dir().join(format!("tika-app-scroll-{}.json", std::process::id())),
    );
    let app = App::new(session, store, &Config::default());
    assert_eq!(app.view(Side::Source).scroll, 4);
}

#[test]
fn test_export_mappings_writes_document() {
    let dir = std::env::temp_dir().join(format!("tika-app-export-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("verse_mappings.json");

    let mut app = test_app("agni vayu", "fire wind extra");
    app.session.create_highlight(Side::Source, 0..4).unwrap();
    app.session.create_highlight(Side::Source, 5..9).unwrap();
    app.session.create_highlight(Side::Translation, 0..4).unwrap();
    app.session.create_highlight(Side::Translation, 5..9).unwrap();
    app.session
        .create_highlight(Side::Translation, 10..15)
        .unwrap();

    app.export_mappings_to(&path);
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"map_id\": 1"));
    assert!(written.contains("\"sanskrit\": \"agni\""));
    assert!(written.contains("\"english\": \"fire\""));
    assert!(!written.contains("extra"), "tail beyond the zip is excluded");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_parse_hex_color() {
    use ratatui::style::Color;
    assert_eq!(parse_hex_color("#EBCB8B"), Some(Color::Rgb(0xEB, 0xCB, 0x8B)));
    assert_eq!(parse_hex_color(" #000000 "), Some(Color::Rgb(0, 0, 0)));
    assert_eq!(parse_hex_color("EBCB8B"), None);
    assert_eq!(parse_hex_color("#EBC"), None);
    assert_eq!(parse_hex_color("#GGGGGG"), None);
}

#[test]
fn test_next_color_name_follows_cursor() {
    let mut app = test_app("a b c d", "");
    assert_eq!(app.next_color_name(Side::Source), "YELLOW");
    app.toggle_anchor();
    app.create_highlight(); // single char under cursor
    assert_eq!(app.next_color_name(Side::Source), "GREEN");
}
