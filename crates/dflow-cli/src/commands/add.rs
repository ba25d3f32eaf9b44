//! Add command for appending a log entry to a day's note.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveTime;
use clap::Args;
use dflow_core::DateKey;
use dflow_vault::{FrontmatterStore, Journal, NewEntry, NoteStore};

use super::util::join_words;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Entry text. A `#tag` naming a log key's alias picks that key.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Log key to file the entry under (defaults to the first configured key).
    #[arg(short, long)]
    pub key: Option<String>,

    /// When the event happened, as HH:MM.
    #[arg(long)]
    pub at: Option<String>,

    /// Do not stamp the entry with the current time.
    #[arg(long)]
    pub no_stamp: bool,
}

/// Runs the add command. `now` is the recorded time unless stamping is off.
pub fn run<W, S>(
    writer: &mut W,
    journal: &mut Journal<S>,
    date: DateKey,
    args: &AddArgs,
    now: NaiveTime,
) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    let entry = NewEntry {
        key: args.key.clone(),
        entry_time: args.at.clone(),
        text: join_words(&args.text),
        stamp: (!args.no_stamp).then_some(now),
    };
    let index = journal
        .add_entry(date, entry)
        .with_context(|| format!("failed to add entry to {date}"))?;

    let line = journal
        .day(date)?
        .and_then(|view| view.events.into_iter().find(|e| e.line_index == index))
        .map(|event| event.to_line())
        .unwrap_or_default();
    writeln!(writer, "{index:>4}  {line}")?;
    Ok(())
}
