//! Edit command for rewriting an existing entry.
//!
//! The entry keeps its recorded time; key and entry time change only when
//! asked to.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use dflow_core::DateKey;
use dflow_vault::{EntryEdit, FrontmatterStore, Journal, NoteStore, Outcome};

use super::util::join_words;

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Line number shown by `dflow show`.
    pub line: usize,

    /// New entry text.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Move the entry to another log key.
    #[arg(short, long)]
    pub key: Option<String>,

    /// New event time as HH:MM; an empty value removes it.
    #[arg(long)]
    pub at: Option<String>,
}

pub fn run<W, S>(writer: &mut W, journal: &mut Journal<S>, date: DateKey, args: &EditArgs) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    let edit = EntryEdit {
        text: join_words(&args.text),
        key: args.key.clone(),
        entry_time: args.at.clone(),
    };
    let outcome = journal
        .edit_entry(date, args.line, edit)
        .with_context(|| format!("failed to edit line {} of {date}", args.line))?;

    match outcome {
        Outcome::Applied => writeln!(writer, "Updated line {}", args.line)?,
        Outcome::Unchanged => writeln!(writer, "Line {} unchanged", args.line)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use dflow_core::Settings;
    use dflow_vault::MemoryVault;

    use super::*;

    fn date() -> DateKey {
        "2025-03-14".parse().unwrap()
    }

    fn edit(journal: &mut Journal<MemoryVault>, args: &EditArgs) -> String {
        let mut out = Vec::new();
        run(&mut out, journal, date(), args).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_edit_rewrites_entry() {
        let mut store = MemoryVault::new();
        let path = store.insert(date(), "# День\nИдея:: 10:00 Купить молоко (10:05)");
        let mut journal = Journal::new(store, Settings::default());

        let args = EditArgs {
            line: 1,
            text: vec!["Купить".to_string(), "кефир".to_string()],
            key: Some("Важно".to_string()),
            at: None,
        };
        assert_eq!(edit(&mut journal, &args), "Updated line 1\n");
        assert_eq!(
            journal.store().get(&path),
            Some("# День\nВажно:: 10:00 Купить кефир (10:05)")
        );

        // Same edit again changes nothing.
        assert_eq!(edit(&mut journal, &args), "Line 1 unchanged\n");

        let args = EditArgs { line: 0, ..args };
        assert_eq!(edit(&mut journal, &args), "Line 0 unchanged\n");
    }
}
