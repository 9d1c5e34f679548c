//! Open command - show a page through the router

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use staffdesk_core::services::views::NOT_AVAILABLE;
use staffdesk_core::{Navigation, Page};

use super::get_context;
use crate::output;

pub fn run(fragment: &str, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let (navigation, page) = ctx.visit(fragment);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "navigation": navigation,
                "page": page,
            }))?
        );
        return Ok(());
    }

    if let Navigation::Redirect { from, to, warning } = &navigation {
        if let Some(w) = warning {
            output::warning(w);
        }
        println!("{}", format!("{} → {}", from.path(), to.path()).dimmed());
    }

    render(&page);
    Ok(())
}

fn render(page: &Page) {
    match page {
        Page::Home { signed_in_as } => {
            println!("{}", "Staffdesk".bold());
            match signed_in_as {
                Some(name) => println!("Signed in as {}", name.cyan()),
                None => {
                    println!("Not signed in.");
                    println!("{}", "Run `sd login` or `sd register` to get started.".dimmed());
                }
            }
        }
        Page::Register => {
            println!("{}", "Create an account".bold());
            println!("  sd register <first> <last> <email>");
        }
        Page::VerifyEmail { pending_email } => {
            println!("{}", "Verify your email".bold());
            match pending_email {
                Some(email) => {
                    println!("A verification email was sent to {}.", email.cyan());
                    println!("{}", "Run `sd verify` to simulate the email link.".dimmed());
                }
                None => println!("Nothing is waiting for verification."),
            }
        }
        Page::Login => {
            println!("{}", "Sign in".bold());
            println!("  sd login <email>");
        }
        Page::Profile(profile) => {
            println!("{}", profile.name.bold());
            println!("  Email: {}", profile.email);
            println!("  Role:  {}", profile.role);
        }
        Page::Employees(rows) => {
            if rows.is_empty() {
                println!("No employees.");
                return;
            }
            let mut table = output::create_table();
            table.set_header(vec!["ID", "Employee ID", "Name", "Position", "Department", "Hired"]);
            for row in rows {
                let department = if row.department == NOT_AVAILABLE {
                    Cell::new(&row.department).fg(Color::DarkGrey)
                } else {
                    Cell::new(&row.department)
                };
                table.add_row(vec![
                    Cell::new(&row.id),
                    Cell::new(&row.employee_id),
                    Cell::new(format!("{}\n{}", row.name, row.email)),
                    Cell::new(&row.position),
                    department,
                    Cell::new(row.hire_date.map(|d| d.to_string()).unwrap_or_default()),
                ]);
            }
            println!("{}", table);
        }
        Page::Departments(rows) => {
            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Description"]);
            for row in rows {
                table.add_row(vec![&row.id, &row.name, &row.description]);
            }
            println!("{}", table);
        }
        Page::Accounts(rows) => {
            let mut table = output::create_table();
            table.set_header(vec!["ID", "Name", "Email", "Role", "Verified", ""]);
            for row in rows {
                let verified = if row.verified {
                    Cell::new("✓").fg(Color::Green)
                } else {
                    Cell::new("no").fg(Color::Yellow)
                };
                table.add_row(vec![
                    Cell::new(&row.id),
                    Cell::new(&row.name),
                    Cell::new(&row.email),
                    Cell::new(row.role),
                    verified,
                    Cell::new(if row.is_self { "you" } else { "" }),
                ]);
            }
            println!("{}", table);
        }
        Page::Requests(rows) => {
            if rows.is_empty() {
                println!("No requests yet.");
                println!("{}", "Run `sd requests new <type> --item <name[:qty]>`".dimmed());
                return;
            }
            let mut table = output::create_table();
            table.set_header(vec!["Date", "Type", "Items", "Status"]);
            for row in rows {
                table.add_row(vec![
                    row.date.format("%Y-%m-%d %H:%M").to_string(),
                    row.kind.clone(),
                    row.items.clone(),
                    row.status.to_string(),
                ]);
            }
            println!("{}", table);
        }
    }
}
