//! Logs command - inspect and prune the event log

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use serde::Serialize;
use staffdesk_core::services::LogEntry;

use super::get_logger;
use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, newest first
    List {
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only failed commands and unsaved changes
        #[arg(long)]
        errors: bool,
        #[arg(long)]
        json: bool,
    },
    /// Drop events older than a number of days
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Do not ask for confirmation
        #[arg(long, short = 'f')]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Event counts per kind and failures per category
    Stats {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Default, PartialEq, Serialize)]
struct Tally {
    total: usize,
    by_event: BTreeMap<String, usize>,
    failures_by_category: BTreeMap<String, usize>,
}

fn tally(entries: &[LogEntry]) -> Tally {
    let mut tally = Tally {
        total: entries.len(),
        ..Tally::default()
    };
    for entry in entries {
        *tally.by_event.entry(entry.event.clone()).or_default() += 1;
        if let Some(category) = &entry.error_message {
            *tally.failures_by_category.entry(category.clone()).or_default() += 1;
        }
    }
    tally
}

fn when(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

pub fn run(command: LogsCommands) -> Result<()> {
    let logger = get_logger().context("Could not open the event log")?;

    match command {
        LogsCommands::List { limit, errors, json } => {
            let entries = if errors {
                logger.get_errors(limit)?
            } else {
                logger.get_recent(limit)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                output::info("The event log is empty");
            } else {
                let mut table = output::create_table();
                table.set_header(vec!["When", "Event", "Command / page", "Failure"]);
                for entry in entries {
                    let subject = entry.command.or(entry.route).unwrap_or_default();
                    let failure = entry
                        .error_message
                        .map(|c| c.red().to_string())
                        .unwrap_or_default();
                    table.add_row(vec![when(entry.timestamp), entry.event, subject, failure]);
                }
                println!("{}", table);
            }
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let cutoff = Utc::now() - Duration::days(older_than_days.max(0));
            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Drop events before {}?", cutoff.format("%Y-%m-%d")))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = logger.delete_before(cutoff.timestamp_millis())?;
            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                output::success(&format!("Dropped {} events", deleted));
            }
        }
        LogsCommands::Stats { json } => {
            let tally = tally(&logger.get_recent(usize::MAX)?);
            let path = logger.log_path();
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "path": path.to_string_lossy(),
                        "size_bytes": size,
                        "tally": tally,
                    })
                );
                return Ok(());
            }

            println!(
                "{} events in {} ({})",
                tally.total.to_string().bold(),
                path.display(),
                output::format_size(size)
            );
            let mut table = output::create_table();
            table.set_header(vec!["Event", "Count"]);
            for (event, count) in &tally.by_event {
                table.add_row(vec![event.clone(), count.to_string()]);
            }
            println!("{}", table);

            for (category, count) in &tally.failures_by_category {
                output::warning(&format!("{} {} failure(s)", count, category));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(event: &str, failure: Option<&str>) -> LogEntry {
        LogEntry {
            id: 1,
            timestamp: 0,
            entry_point: "cli".to_string(),
            app_version: "0.1.0".to_string(),
            platform: "linux".to_string(),
            event: event.to_string(),
            route: None,
            command: Some("sign_in".to_string()),
            error_message: failure.map(str::to_string),
            error_details: None,
        }
    }

    #[test]
    fn test_tally_groups_events_and_failures() {
        let entries = vec![
            entry("command_executed", None),
            entry("command_failed", Some("auth")),
            entry("command_failed", Some("auth")),
            entry("save_failed", Some("Storage quota exceeded")),
        ];
        let tally = tally(&entries);
        assert_eq!(tally.total, 4);
        assert_eq!(tally.by_event["command_failed"], 2);
        assert_eq!(tally.failures_by_category["auth"], 2);
        assert_eq!(tally.failures_by_category.len(), 2);
    }
}
