//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Local-first calorie ledger.
///
/// Records what you eat and totals calories per UTC calendar day.
#[derive(Debug, Parser)]
#[command(name = "kcal", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a food entry.
    Add {
        /// What was eaten.
        name: String,

        /// Calorie count (non-negative integer).
        #[arg(allow_negative_numbers = true)]
        calories: i64,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List every entry, most recent first.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List entries for one UTC day, earliest first.
    Entries {
        /// Day to show as YYYY-MM-DD (default: today, UTC).
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the calorie total for one UTC day.
    Total {
        /// Day to total as YYYY-MM-DD (default: today, UTC).
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show database location and ledger health.
    Status,
}
