//! CLI command implementations

pub mod accounts;
pub mod auth;
pub mod departments;
pub mod doctor;
pub mod employees;
pub mod init;
pub mod logs;
pub mod open;
pub mod requests;

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use staffdesk_core::services::{EntryPoint, LogEvent, LoggingService};
use staffdesk_core::{Command, StaffdeskContext};

use crate::output;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("STAFFDESK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".staffdesk"))
}

/// Open the data directory, restoring the remembered session
pub fn get_context() -> Result<StaffdeskContext> {
    let data_dir = get_data_dir()?;
    tracing::debug!(data_dir = %data_dir.display(), "opening data directory");

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    StaffdeskContext::new(&data_dir, EntryPoint::Cli)
        .context("Failed to initialize staffdesk context")
}

/// Dispatch one command and report its outcome
pub fn execute(command: Command, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let outcome = ctx.dispatch(command)?;
    output::outcome(&outcome, json)
}

/// Use the given password, or read one from stdin / an interactive prompt.
///
/// Piped stdin is read as a single line so scripts can supply passwords
/// without putting them on the command line.
pub fn read_password(given: Option<String>, prompt: &str, confirm: bool) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }

    if !atty::is(atty::Stream::Stdin) {
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read password from stdin")?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let mut input = dialoguer::Password::new().with_prompt(prompt);
    if confirm {
        input = input.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(input.interact()?)
}
