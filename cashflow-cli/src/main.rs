//! Cashflow CLI - bank-statement imports in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{chart, clear, delete, edit, import, list, logs, status};
use cashflow_core::services::LogEvent;

/// Cashflow - import bank-statement CSV files and inspect your cash flow
#[derive(Parser)]
#[command(name = "cashflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a bank-statement CSV file
    Import {
        /// Path to CSV file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored transactions
    List {
        /// Only rows for this account number
        #[arg(long)]
        account_number: Option<String>,
        /// Only rows for this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one stored transaction
    Show {
        /// Transaction ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit fields of a stored transaction
    Edit {
        /// Transaction ID
        id: String,
        #[command(flatten)]
        fields: edit::EditFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one stored transaction
    Delete {
        /// Transaction ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every stored transaction
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count stored transactions
    Count {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Monthly money in and money out
    Chart {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage event logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Import { .. } => "import",
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Edit { .. } => "edit",
            Commands::Delete { .. } => "delete",
            Commands::Clear { .. } => "clear",
            Commands::Count { .. } => "count",
            Commands::Chart { .. } => "chart",
            Commands::Status { .. } => "status",
            Commands::Logs { .. } => "logs",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    {
        // Closed before the command runs; commands open their own logger.
        let logger = commands::get_logger();
        commands::log_event(
            &logger,
            LogEvent::new("command_executed").with_command(cli.command.name()),
        );
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import { file, json } => import::run(&file, json).await,
        Commands::List { account_number, date, json } => {
            list::run(account_number.as_deref(), date.as_deref(), json).await
        }
        Commands::Show { id, json } => list::run_show(&id, json).await,
        Commands::Edit { id, fields, json } => edit::run(&id, fields, json).await,
        Commands::Delete { id, json } => delete::run(&id, json).await,
        Commands::Clear { force, json } => clear::run(force, json).await,
        Commands::Count { json } => status::run_count(json).await,
        Commands::Chart { json } => chart::run(json).await,
        Commands::Status { json } => status::run(json),
        Commands::Logs { command } => logs::run(command),
    }
}
