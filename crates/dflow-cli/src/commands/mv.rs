//! Mv command for reordering entries.

use std::io::Write;

use anyhow::{Context, Result};
use dflow_core::DateKey;
use dflow_vault::{FrontmatterStore, Journal, NoteStore, Outcome};

pub fn run<W, S>(
    writer: &mut W,
    journal: &mut Journal<S>,
    date: DateKey,
    from: usize,
    to: usize,
) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    let outcome = journal
        .move_entry(date, from, to)
        .with_context(|| format!("failed to move line {from} of {date}"))?;

    match outcome {
        Outcome::Applied => writeln!(writer, "Moved line {from} to line {to}")?,
        Outcome::Unchanged => writeln!(writer, "Nothing moved")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use dflow_core::Settings;
    use dflow_vault::MemoryVault;

    use super::*;

    #[test]
    fn test_mv_swaps_entry_slots() {
        let date: DateKey = "2025-03-14".parse().unwrap();
        let mut store = MemoryVault::new();
        let path = store.insert(date, "dl:: a\nтекст\ndl:: b\ndl:: c");
        let mut journal = Journal::new(store, Settings::default());

        let mut out = Vec::new();
        run(&mut out, &mut journal, date, 3, 0).unwrap();
        run(&mut out, &mut journal, date, 1, 0).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Moved line 3 to line 0\nNothing moved\n"
        );
        assert_eq!(journal.store().get(&path), Some("dl:: c\nтекст\ndl:: a\ndl:: b"));
    }
}
