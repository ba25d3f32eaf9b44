use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use dflow_core::DateKey;
use dflow_vault::{FileVault, Journal};
use tracing_subscriber::EnvFilter;

use dflow_cli::commands::{add, edit, habit, mv, new, path, rm, show, util, watch};
use dflow_cli::{Cli, Commands, Config};

/// Load config and open the journal it points at.
fn open_journal(config_path: Option<&Path>) -> Result<(Journal<FileVault>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let vault = FileVault::new(&config.journal_root).with_extension(&config.extension);
    Ok((Journal::new(vault, config.settings()), config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let date = util::resolve_date(cli.date.as_deref(), DateKey::today())?;
    let (mut journal, config) = open_journal(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match command {
        Commands::Show(args) => show::run(&mut stdout, &journal, date, args)?,
        Commands::New => new::run(&mut stdout, &mut journal, date)?,
        Commands::Add(args) => {
            add::run(&mut stdout, &mut journal, date, args, Local::now().time())?;
        }
        Commands::Edit(args) => edit::run(&mut stdout, &mut journal, date, args)?,
        Commands::Rm { line } => rm::run(&mut stdout, &mut journal, date, *line)?,
        Commands::Mv { from, to } => mv::run(&mut stdout, &mut journal, date, *from, *to)?,
        Commands::Habit(args) => habit::run(&mut stdout, &mut journal, date, args)?,
        Commands::Path => path::run(&mut stdout, &journal, date)?,
        Commands::Watch => watch::run(&mut stdout, &journal, date, config.debounce())?,
    }

    Ok(())
}
