//! Show command for a day's habits and log entries.
//!
//! Line numbers in the output are the ones `edit`, `rm` and `mv` take.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use dflow_core::{DateKey, Settings};
use dflow_vault::{DayView, FrontmatterStore, Journal, NoteStore};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

// ========== Human-Readable Output ==========

/// Format a day for human-readable output.
pub fn format_day(view: &DayView, settings: &Settings) -> String {
    let mut output = String::new();

    writeln!(output, "{}", view.date).unwrap();

    if !view.habits.is_empty() {
        let width = view
            .habits
            .iter()
            .map(|habit| habit.key.chars().count())
            .max()
            .unwrap_or(0);
        writeln!(output).unwrap();
        writeln!(output, "HABITS").unwrap();
        for habit in &view.habits {
            writeln!(output, "  {:<width$}  {}", habit.key, habit.value).unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(output, "LOG").unwrap();
    if view.events.is_empty() {
        writeln!(output, "  No entries yet.").unwrap();
    }
    for event in &view.events {
        // SVG icons only make sense in a rendered view.
        let icon = settings
            .icon_for(&event.key)
            .filter(|icon| !icon.trim_start().starts_with('<'))
            .map_or_else(String::new, |icon| format!("{icon} "));
        writeln!(output, "{:>4}  {icon}{}", event.line_index, event.to_line()).unwrap();
    }

    output
}

/// Message for a day without a note.
pub fn format_missing(date: DateKey) -> String {
    format!("No note for {date}. Run 'dflow new --date {date}' to create it.\n")
}

// ========== Public Interface ==========

/// Runs the show command.
pub fn run<W, S>(writer: &mut W, journal: &Journal<S>, date: DateKey, args: &ShowArgs) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    let view = journal
        .day(date)
        .with_context(|| format!("failed to read note for {date}"))?;

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&view)?)?;
        return Ok(());
    }

    match view {
        Some(view) => write!(writer, "{}", format_day(&view, journal.settings()))?,
        None => write!(writer, "{}", format_missing(date))?,
    }
    Ok(())
}
