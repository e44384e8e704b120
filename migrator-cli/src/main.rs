//! Migrator CLI - apply SQL migration files from the terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod commands;
mod output;

use commands::{migrate, new, status};

/// Migrator - apply a directory of SQL migrations exactly once
#[derive(Parser)]
#[command(name = "migrator", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Settings file (defaults to ./migrator.json when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, short = 'd', global = true)]
    pub database: Option<PathBuf>,

    /// Migrations directory
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Bookkeeping table name
    #[arg(long, global = true)]
    pub table: Option<String>,

    /// Show statement-level progress
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Migrate {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show applied and pending migrations
    Status {
        /// Only list pending migrations
        #[arg(long)]
        pending: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new timestamped migration file
    New {
        /// Short description, e.g. "create_users"
        name: String,
    },
}

impl Commands {
    fn wants_json(&self) -> bool {
        match self {
            Commands::Migrate { json } | Commands::Status { json, .. } => *json,
            Commands::New { .. } => false,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    commands::init_logging(&cli.global, cli.command.wants_json());

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Migrate { json } => migrate::run(&cli.global, json),
        Commands::Status { pending, json } => status::run(&cli.global, pending, json),
        Commands::New { name } => new::run(&cli.global, &name),
    }
}
