//! Tika CLI - dual-pane parallel-text annotator TUI

mod app;
mod config;
mod ui;
mod views;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tika_core::{ProjectRecord, ProjectStore, Session, Side};

#[derive(Parser, Debug)]
#[command(name = "tika")]
#[command(author, version, about = "A dual-pane parallel-text annotator")]
struct Args {
    /// Plain-text files to import: source [translation]
    #[arg(num_args = 0..=2)]
    texts: Vec<PathBuf>,

    /// Project document to import (kalidasa_project.json shape)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Project store path (default: the platform data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Write the project document to FILE and exit
    #[arg(long, value_name = "FILE")]
    export_project: Option<PathBuf>,

    /// Write the alignment mappings to FILE and exit
    #[arg(long, value_name = "FILE")]
    export_mappings: Option<PathBuf>,
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tika").join("project.json"))
        .unwrap_or_else(|| PathBuf::from("tika_project.json"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::Config::load();

    let store_path = args
        .store
        .clone()
        .or_else(|| config.files.store.clone())
        .unwrap_or_else(default_store_path);
    let store = ProjectStore::new(store_path);

    // Restore the stored session; an unreadable store must not wedge
    // startup, it just starts empty.
    let mut session = match store.load() {
        Ok(Some(record)) => Session::from_record(&record),
        Ok(None) => Session::new(),
        Err(err) => {
            eprintln!("Warning: ignoring unreadable store: {}", err);
            Session::new()
        }
    };

    if let Some(path) = &args.project {
        let json = std::fs::read_to_string(path)
            .context(format!("Failed to read project: {}", path.display()))?;
        let record = ProjectRecord::from_json(&json)
            .context(format!("Invalid project document: {}", path.display()))?;
        session.import_project(&record);
    }

    for (path, side) in args.texts.iter().zip(Side::BOTH) {
        let text = std::fs::read_to_string(path)
            .context(format!("Failed to read: {}", path.display()))?;
        session.import_text(side, &text);
    }

    // Headless export mode: write the requested documents and exit
    if args.export_project.is_some() || args.export_mappings.is_some() {
        if let Some(path) = &args.export_project {
            std::fs::write(path, session.to_record().to_json_pretty())
                .context(format!("Failed to write: {}", path.display()))?;
            println!("Wrote project to {}", path.display());
        }
        if let Some(path) = &args.export_mappings {
            let mappings = session.alignment();
            std::fs::write(path, tika_core::project::mappings_to_json(&mappings))
                .context(format!("Failed to write: {}", path.display()))?;
            println!("Wrote {} mappings to {}", mappings.len(), path.display());
        }
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, store, &config);

    // Run event loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(16);

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Char('q') => {
                        if app.show_help {
                            app.show_help = false;
                        } else {
                            app.quit();
                        }
                    }
                    KeyCode::Esc => {
                        if app.show_help {
                            app.show_help = false;
                        } else if app.has_selection() {
                            app.clear_selection();
                        } else {
                            app.quit();
                        }
                    }
                    KeyCode::Tab => app.switch_focus(),
                    // Cursor movement
                    KeyCode::Left | KeyCode::Char('h') => app.move_left(),
                    KeyCode::Right | KeyCode::Char('l') => app.move_right(),
                    KeyCode::Up | KeyCode::Char('k') => app.move_up(),
                    KeyCode::Down | KeyCode::Char('j') => app.move_down(),
                    KeyCode::Home | KeyCode::Char('0') => app.move_line_start(),
                    KeyCode::End | KeyCode::Char('$') => app.move_line_end(),
                    KeyCode::Char('g') => app.move_top(),
                    KeyCode::Char('G') => app.move_bottom(),
                    KeyCode::PageUp => app.page_up(viewport_lines()),
                    KeyCode::PageDown => app.page_down(viewport_lines()),
                    // Selection and annotation
                    KeyCode::Char('v') => app.toggle_anchor(),
                    KeyCode::Enter | KeyCode::Char('H') => app.create_highlight(),
                    KeyCode::Char('x') | KeyCode::Delete => app.remove_highlight(),
                    KeyCode::Char('z') if ctrl => app.undo(),
                    KeyCode::Char('u') => app.undo(),
                    // Persistence and export
                    KeyCode::Char('s') if ctrl => app.save(),
                    KeyCode::Char('E') => app.export_project(),
                    KeyCode::Char('M') => app.export_mappings(),
                    KeyCode::Char('?') => app.show_help = !app.show_help,
                    _ => {}
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Page size for PageUp/PageDown: the viewport minus chrome rows.
fn viewport_lines() -> usize {
    crossterm::terminal::size()
        .map(|(_, rows)| rows.saturating_sub(4) as usize)
        .unwrap_or(10)
}
