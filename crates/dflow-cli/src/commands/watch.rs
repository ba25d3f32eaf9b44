//! Watch command: reprint the day whenever its note changes on disk.

use std::io::Write;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use dflow_core::DateKey;
use dflow_vault::{FrontmatterStore, Journal, NoteStore, NoteWatcher};

use super::show::{format_day, format_missing};

fn render<S>(journal: &Journal<S>, date: DateKey) -> Result<String>
where
    S: NoteStore + FrontmatterStore,
{
    let view = journal
        .day(date)
        .with_context(|| format!("failed to read note for {date}"))?;
    Ok(view.map_or_else(
        || format_missing(date),
        |view| format_day(&view, journal.settings()),
    ))
}

/// Runs until interrupted.
///
/// A day without a note is reported once; there is nothing to watch yet.
pub fn run<W, S>(writer: &mut W, journal: &Journal<S>, date: DateKey, window: Duration) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    let path = journal.note_path(date);
    let exists = journal
        .store()
        .read(&path)
        .with_context(|| format!("failed to read {}", path.display()))?
        .is_some();
    if !exists {
        write!(writer, "{}", format_missing(date))?;
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let _watcher = NoteWatcher::spawn(&path, window, move || {
        let _ = tx.send(());
    })
    .with_context(|| format!("failed to watch {}", path.display()))?;

    write!(writer, "{}", render(journal, date)?)?;
    writer.flush()?;

    for () in rx {
        writeln!(writer)?;
        write!(writer, "{}", render(journal, date)?)?;
        writer.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use dflow_core::Settings;
    use dflow_vault::MemoryVault;

    use super::*;

    #[test]
    fn test_render_matches_show() {
        let date: DateKey = "2025-03-14".parse().unwrap();
        let mut store = MemoryVault::new();
        store.insert(date, "dl:: x");
        let journal = Journal::new(store, Settings::default());
        let rendered = render(&journal, date).unwrap();
        assert!(rendered.starts_with("2025-03-14\n"));
        assert!(rendered.ends_with("   0  📄 dl:: x\n"));

        let other: DateKey = "2025-03-15".parse().unwrap();
        assert!(render(&journal, other).unwrap().starts_with("No note for 2025-03-15."));
    }

    #[test]
    fn test_missing_note_is_reported_without_watching() {
        let date: DateKey = "2025-03-14".parse().unwrap();
        let journal = Journal::new(MemoryVault::with_root("/nonexistent/journal"), Settings::default());

        let mut out = Vec::new();
        run(&mut out, &journal, date, Duration::from_millis(10)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No note for 2025-03-14. Run 'dflow new --date 2025-03-14' to create it.\n"
        );
        assert!(!journal.note_path(date).parent().unwrap().exists());
    }
}
