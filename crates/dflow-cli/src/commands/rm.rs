//! Rm command for deleting an entry.

use std::io::Write;

use anyhow::{Context, Result};
use dflow_core::DateKey;
use dflow_vault::{FrontmatterStore, Journal, NoteStore, Outcome};

pub fn run<W, S>(writer: &mut W, journal: &mut Journal<S>, date: DateKey, line: usize) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    let outcome = journal
        .remove_entry(date, line)
        .with_context(|| format!("failed to remove line {line} of {date}"))?;

    match outcome {
        Outcome::Applied => writeln!(writer, "Removed line {line}")?,
        Outcome::Unchanged => writeln!(writer, "Line {line} is not an entry; nothing removed")?,
    }
    Ok(())
}
