use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use kcal_core::{Ledger, SystemClock};
use kcal_db::Database;
use tracing_subscriber::EnvFilter;

use kcal_cli::commands::{add, entries, list, status, total};
use kcal_cli::{Cli, Commands, Config};

/// Load config and open the ledger, ensuring the database directory exists.
fn open_ledger(config_path: Option<&Path>) -> Result<(Ledger<Database>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    config
        .ensure_database_dir()
        .context("failed to create database directory")?;

    let db = Database::open(&config.database_path).context("failed to open database")?;
    Ok((Ledger::with_system_clock(db), config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so --json output on stdout stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Some(Commands::Add {
            name,
            calories,
            json,
        }) => {
            let (ledger, _config) = open_ledger(cli.config.as_deref())?;
            add::run(&mut out, &ledger, &name, calories, json)?;
        }
        Some(Commands::List { json }) => {
            let (ledger, _config) = open_ledger(cli.config.as_deref())?;
            list::run(&mut out, &ledger, json)?;
        }
        Some(Commands::Entries { date, json }) => {
            let (ledger, _config) = open_ledger(cli.config.as_deref())?;
            entries::run(&mut out, &ledger, date, json)?;
        }
        Some(Commands::Total { date, json }) => {
            let (ledger, _config) = open_ledger(cli.config.as_deref())?;
            total::run(&mut out, &ledger, date, json)?;
        }
        Some(Commands::Status) => {
            let (ledger, config) = open_ledger(cli.config.as_deref())?;
            status::run(&mut out, ledger.store(), &config.database_path, &SystemClock)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}
