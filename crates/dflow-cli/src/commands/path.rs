//! Path command for printing where a day's note lives.

use std::io::Write;

use anyhow::Result;
use dflow_core::DateKey;
use dflow_vault::{FrontmatterStore, Journal, NoteStore};

pub fn run<W, S>(writer: &mut W, journal: &Journal<S>, date: DateKey) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    writeln!(writer, "{}", journal.note_path(date).display())?;
    Ok(())
}
