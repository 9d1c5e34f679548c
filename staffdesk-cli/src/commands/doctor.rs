//! Doctor command - run data health checks

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use serde::Serialize;
use staffdesk_core::StaffdeskContext;

use super::{get_context, get_data_dir};
use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Pass,
    Warning,
    Error,
}

#[derive(Debug, Serialize)]
struct Check {
    name: &'static str,
    status: Status,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

impl Check {
    fn new(name: &'static str, status: Status, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            details: Vec::new(),
        }
    }
}

fn check_snapshot(ctx: &StaffdeskContext) -> Check {
    let db = ctx.directory.database();
    let summary = format!(
        "{} accounts, {} departments, {} employees, {} requests",
        db.accounts.len(),
        db.departments.len(),
        db.employees.len(),
        db.requests.len()
    );
    match ctx.persistence.save(db) {
        Ok(()) => Check::new("snapshot", Status::Pass, summary),
        Err(e) => Check::new("snapshot", Status::Error, format!("Cannot save: {}", e)),
    }
}

fn check_quota(ctx: &StaffdeskContext, used: u64) -> Check {
    match ctx.config.quota_bytes {
        None => Check::new("quota", Status::Pass, format!("{} used, no limit", output::format_size(used))),
        Some(limit) => {
            let message = format!(
                "{} of {} used",
                output::format_size(used),
                output::format_size(limit)
            );
            // Warn well before writes start failing
            let status = if used.saturating_mul(10) >= limit.saturating_mul(8) {
                Status::Warning
            } else {
                Status::Pass
            };
            Check::new("quota", status, message)
        }
    }
}

fn check_admins(ctx: &StaffdeskContext) -> Check {
    let admins = ctx
        .directory
        .accounts()
        .iter()
        .filter(|a| a.is_admin() && a.verified)
        .count();
    if admins == 0 {
        Check::new(
            "admins",
            Status::Warning,
            "No verified admin account; admin pages are unreachable",
        )
    } else {
        Check::new("admins", Status::Pass, format!("{} verified admin(s)", admins))
    }
}

fn check_references(ctx: &StaffdeskContext) -> Check {
    let problems = ctx.check_references();
    if problems.is_empty() {
        return Check::new("references", Status::Pass, "All references resolve");
    }
    let mut check = Check::new(
        "references",
        Status::Warning,
        format!("{} dangling reference(s)", problems.len()),
    );
    check.details = problems.iter().map(|p| p.to_string()).collect();
    check
}

/// Total size of the storage slots on disk
fn storage_bytes() -> Result<u64> {
    let dir = get_data_dir()?.join("storage");
    let mut total = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        total += entry.metadata()?.len();
    }
    Ok(total)
}

pub fn run(verbose: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let checks = vec![
        check_snapshot(&ctx),
        check_quota(&ctx, storage_bytes()?),
        check_admins(&ctx),
        check_references(&ctx),
    ];
    let count = |status: Status| checks.iter().filter(|c| c.status == status).count();
    let (passed, warnings, errors) = (count(Status::Pass), count(Status::Warning), count(Status::Error));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "checks": checks,
                "summary": { "passed": passed, "warnings": warnings, "errors": errors },
            }))?
        );
    } else {
        println!("{}", "Data Health Check".bold());
        println!();

        let mut table = output::create_table();
        table.set_header(vec!["Check", "Status", "Message"]);
        for check in &checks {
            let status_cell = match check.status {
                Status::Pass => Cell::new("PASS").fg(Color::Green),
                Status::Warning => Cell::new("WARN").fg(Color::Yellow),
                Status::Error => Cell::new("ERROR").fg(Color::Red),
            };
            table.add_row(vec![Cell::new(check.name), status_cell, Cell::new(&check.message)]);

            if verbose {
                for detail in &check.details {
                    table.add_row(vec![
                        Cell::new(""),
                        Cell::new(""),
                        Cell::new(format!("  - {}", detail)),
                    ]);
                }
            }
        }
        println!("{}", table);
        println!();

        println!(
            "Summary: {} passed, {} warnings, {} errors",
            passed.to_string().green(),
            warnings.to_string().yellow(),
            errors.to_string().red(),
        );
    }

    if errors > 0 {
        std::process::exit(1);
    }

    Ok(())
}
