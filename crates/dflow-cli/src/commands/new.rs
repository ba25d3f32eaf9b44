//! New command for creating a day's note.

use std::io::Write;

use anyhow::{Context, Result};
use dflow_core::DateKey;
use dflow_vault::{FrontmatterStore, Journal, NoteStore};

pub fn run<W, S>(writer: &mut W, journal: &mut Journal<S>, date: DateKey) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    let existed = journal.day(date)?.is_some();
    let path = journal
        .create_note(date)
        .with_context(|| format!("failed to create note for {date}"))?;

    if existed {
        writeln!(writer, "Note already exists: {}", path.display())?;
    } else {
        writeln!(writer, "Created {}", path.display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use dflow_core::Settings;
    use dflow_vault::MemoryVault;

    use super::*;

    #[test]
    fn test_new_creates_once() {
        let date: DateKey = "2025-03-14".parse().unwrap();
        let mut journal = Journal::new(MemoryVault::new(), Settings::default());

        let mut out = Vec::new();
        run(&mut out, &mut journal, date).unwrap();
        run(&mut out, &mut journal, date).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Created journal/2025/03/2025-03-14.md\nNote already exists: journal/2025/03/2025-03-14.md\n"
        );
        assert_eq!(journal.store().note_count(), 1);
    }
}
