//! Staffdesk CLI - HR records in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{accounts, auth, departments, doctor, employees, init, logs, open, requests};

/// Staffdesk - accounts, departments, employees and requests
#[derive(Parser)]
#[command(name = "sd", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default settings
    Init {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a page, e.g. `sd open #/employees` or `sd open requests`
    Open {
        /// Location fragment; empty opens the home page
        #[arg(default_value = "")]
        fragment: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a new account (unverified until `sd verify`)
    Register {
        first_name: String,
        last_name: String,
        email: String,
        /// Password (prompted, or read from piped stdin, if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify the most recently registered email
    Verify {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in and remember the session
    Login {
        email: String,
        /// Password (prompted, or read from piped stdin, if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out and forget the session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage your own profile
    Profile {
        #[command(subcommand)]
        command: auth::ProfileCommands,
    },

    /// Manage accounts (admin)
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountsCommands,
    },

    /// Manage departments (admin)
    Departments {
        #[command(subcommand)]
        command: departments::DepartmentsCommands,
    },

    /// Manage employees (admin)
    Employees {
        #[command(subcommand)]
        command: employees::EmployeesCommands,
    },

    /// Submit requests
    Requests {
        #[command(subcommand)]
        command: requests::RequestsCommands,
    },

    /// Run data health checks
    Doctor {
        /// Show verbose output
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

/// Diagnostics go to stderr, filtered by STAFFDESK_LOG (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_env("STAFFDESK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

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
        Commands::Init { json } => init::run(json),
        Commands::Open { fragment, json } => open::run(&fragment, json),
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            json,
        } => auth::register(first_name, last_name, email, password, json),
        Commands::Verify { json } => auth::verify(json),
        Commands::Login { email, password, json } => auth::login(email, password, json),
        Commands::Logout { json } => auth::logout(json),
        Commands::Profile { command } => auth::profile(command),
        Commands::Accounts { command } => accounts::run(command),
        Commands::Departments { command } => departments::run(command),
        Commands::Employees { command } => employees::run(command),
        Commands::Requests { command } => requests::run(command),
        Commands::Doctor { verbose, json } => doctor::run(verbose, json),
        Commands::Logs { command } => logs::run(command),
    }
}
