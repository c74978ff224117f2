//! Command-line front end over a ledger JSON snapshot.

mod commands;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::{
    config::{Config, ConfigManager},
    core::{forecast::Scenario, services::ServiceError},
    errors::CashflowError,
    ledger::ContextFilter,
};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CashflowError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("{0}")]
    Usage(String),
}

#[derive(Debug, Parser)]
#[command(name = "cashflow_cli")]
#[command(about = "Recurring commitments and cash-flow forecasts over a ledger snapshot")]
#[command(version)]
pub struct Cli {
    /// Path to a ledger JSON file
    ///
    /// When omitted, the named ledger is loaded from the application data
    /// directory (`CASHFLOW_CORE_HOME` or `~/.cashflow_core`).
    #[arg(short, long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Name of a stored ledger, used when `--ledger` is not given
    #[arg(short, long, global = true, default_value = "default")]
    pub name: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Project future months of income, expenses and balance
    Forecast {
        /// Horizon in months (defaults to the configured value)
        #[arg(short, long)]
        months: Option<u32>,

        /// optimistic, realistic or pessimistic
        #[arg(short, long)]
        scenario: Option<Scenario>,

        /// all, business or personal
        #[arg(short, long)]
        context: Option<ContextFilter>,

        /// Show all three scenarios side by side
        #[arg(long)]
        compare: bool,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Handle every recurring item that has fallen due and save the ledger
    Process {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print the plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Spent versus budgeted for the budgets active today
    Budgets {
        #[arg(long)]
        today: Option<NaiveDate>,

        #[arg(short, long)]
        context: Option<ContextFilter>,
    },
    /// List upcoming recurring obligations
    Upcoming {
        /// Days ahead to include
        #[arg(short, long, default_value_t = 30)]
        days: u32,

        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print build information
    Version,
}

/// Parses `std::env::args` and runs the selected command.
pub fn run_cli() -> Result<(), CliError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    if let Commands::Version = cli.command {
        commands::version();
        return Ok(());
    }

    let config = load_config()?;
    let source = commands::LedgerSource::resolve(cli.ledger, &cli.name)?;

    match cli.command {
        Commands::Forecast {
            months,
            scenario,
            context,
            compare,
            today,
        } => commands::forecast(&source, &config, months, scenario, context, compare, today),
        Commands::Process { today, dry_run } => commands::process(&source, &config, today, dry_run),
        Commands::Budgets { today, context } => commands::budgets(&source, &config, today, context),
        Commands::Upcoming { days, today } => commands::upcoming(&source, &config, days, today),
        Commands::Version => Ok(()),
    }
}

fn load_config() -> Result<Config, CliError> {
    let manager = ConfigManager::new()?;
    Ok(manager.load()?)
}
