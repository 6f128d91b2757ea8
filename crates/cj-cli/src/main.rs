use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cj_cli::commands::{
    day, delete, export, insight, levels, log, now, report, reset, sleep, status, tags, theme,
};
use cj_cli::{Cli, Commands, Config, Journal};

/// Load config and open the journal in the local timezone.
fn open_journal(config_path: Option<&Path>) -> Result<(Journal<Local>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let journal = Journal::open(&config.database_path, Local)?;
    Ok((journal, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (mut journal, config) = open_journal(cli.config.as_deref())?;
    let now_local = journal.now();
    let today = now_local.date();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Log(args) => log::run(&mut out, args, &mut journal, today)?,
        Commands::Now(args) => now::run(&mut out, args, &mut journal, now_local)?,
        Commands::Delete(args) => delete::run(&mut out, args, &mut journal, today)?,
        Commands::Sleep(args) => sleep::run(&mut out, args, &mut journal, today)?,
        Commands::Reset(args) => reset::run(&mut out, args, &mut journal, today)?,
        Commands::Day(args) => day::run(&mut out, args, &journal, today)?,
        Commands::Levels => levels::run(&mut out)?,
        Commands::Report(args) => report::run(&mut out, args, &journal)?,
        Commands::Tags(action) => tags::run(&mut out, action, &mut journal)?,
        Commands::Export(args) => export::run(&mut out, args, &journal, today)?,
        Commands::Insight(args) => insight::run(&mut out, args, &mut journal, &config, today)?,
        Commands::Theme(action) => theme::run(&mut out, action, &mut journal)?,
        Commands::Status => status::run(&mut out, &journal, &config)?,
    }

    out.flush()?;
    Ok(())
}
