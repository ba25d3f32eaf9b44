//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{add::AddArgs, edit::EditArgs, habit::HabitArgs, show::ShowArgs};

/// Daily journal log and habit tracker.
///
/// Keeps a timestamped event log and habit values in one plain-text note
/// per day.
#[derive(Debug, Parser)]
#[command(name = "dflow", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Day to work on: today, yesterday, tomorrow, +N, -N, YYYY-MM-DD or a
    /// daily note's file path.
    #[arg(short, long, global = true, allow_hyphen_values = true)]
    pub date: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the day's habits and log entries.
    Show(ShowArgs),

    /// Create the day's note.
    New,

    /// Append a log entry.
    Add(AddArgs),

    /// Rewrite the entry on a line.
    Edit(EditArgs),

    /// Delete the entry on a line.
    Rm {
        /// Line number shown by `dflow show`.
        line: usize,
    },

    /// Move an entry to another entry's position.
    Mv {
        /// Line of the entry to move.
        from: usize,
        /// Line of the entry whose position it takes.
        to: usize,
    },

    /// Set a habit value.
    Habit(HabitArgs),

    /// Print the path of the day's note.
    Path,

    /// Print the day's entries whenever the note changes.
    Watch,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_day_offset_parses() {
        let cli = Cli::try_parse_from(["dflow", "--date", "-1", "add", "Обед", "#идея"]).unwrap();
        assert_eq!(cli.date.as_deref(), Some("-1"));
        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.text, vec!["Обед", "#идея"]);
    }
}
