//! Habit command for setting a habit value in the note's frontmatter.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use dflow_core::DateKey;
use dflow_vault::{FrontmatterStore, Journal, NoteStore};

#[derive(Debug, Args)]
pub struct HabitArgs {
    /// Habit key as configured, e.g. `Сон`.
    pub key: String,

    /// New value: yes/no for checkboxes, a number, or free text.
    pub value: String,
}

pub fn run<W, S>(writer: &mut W, journal: &mut Journal<S>, date: DateKey, args: &HabitArgs) -> Result<()>
where
    W: Write,
    S: NoteStore + FrontmatterStore,
{
    let value = journal
        .set_habit(date, &args.key, &args.value)
        .with_context(|| format!("failed to set habit {} for {date}", args.key))?;
    writeln!(writer, "{}: {value}", args.key)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use dflow_core::Settings;
    use dflow_vault::MemoryVault;

    use super::*;

    fn set(journal: &mut Journal<MemoryVault>, key: &str, value: &str) -> Result<String> {
        let date: DateKey = "2025-03-14".parse().unwrap();
        let mut out = Vec::new();
        let args = HabitArgs {
            key: key.to_string(),
            value: value.to_string(),
        };
        run(&mut out, journal, date, &args)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_habit_sets_frontmatter() {
        let date: DateKey = "2025-03-14".parse().unwrap();
        let mut store = MemoryVault::new();
        let path = store.insert(date, "---\n---\ndl:: x");
        let mut journal = Journal::new(store, Settings::default());

        assert_eq!(set(&mut journal, "Зарядка", "yes").unwrap(), "Зарядка: ✓\n");
        assert_eq!(set(&mut journal, "Сон", "7.5").unwrap(), "Сон: 7.5\n");
        assert_eq!(
            journal.store().get(&path),
            Some("---\nЗарядка: true\nСон: 7.5\n---\ndl:: x")
        );
    }

    #[test]
    fn test_habit_rejects_bad_input() {
        let mut journal = Journal::new(MemoryVault::new(), Settings::default());
        let err = set(&mut journal, "Чтение", "1").unwrap_err();
        assert_eq!(format!("{err:#}"), "failed to set habit Чтение for 2025-03-14: unknown habit: Чтение");

        let err = set(&mut journal, "Зарядка", "maybe").unwrap_err();
        assert!(format!("{err:#}").ends_with("expected yes/no for a checkbox habit, got \"maybe\""));
    }
}
